use crate::metrics::Ratio;

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

pub fn format_usd(value: f64) -> String {
  let fixed = format!("{:.2}", value.abs());
  let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
  format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

pub fn format_count(value: u64) -> String {
  group_thousands(&value.to_string())
}

pub fn format_pct(value: f64) -> String {
  format!("{value:.2}%")
}

pub fn format_usd_ratio(ratio: Ratio) -> String {
  ratio.value().map(format_usd).unwrap_or_else(|| ratio.to_string())
}

pub fn format_pct_ratio(ratio: Ratio) -> String {
  ratio.value().map(format_pct).unwrap_or_else(|| ratio.to_string())
}
