//! Static commentary shown beside each chart. Markdown.

pub const INTRO: &str = "\
- The report uses data collected over the 2022 fiscal year to analyze daily ad spend, daily installs, total installs by country and by app, daily payouts and daily revenue.
- The aim is to identify trends, patterns and areas for improvement that can inform strategic decisions and guide future investments and promotions.
- Charts and graphs illustrate the key findings.
";

pub const ADS_SPEND: &str = "\
- Daily ads spend for 2022 fluctuates clearly throughout the year, with some months spending well above others.
- The highest spend falls in November, followed by August and January; the lowest in March, followed by April, June and October.
- The dips in mid-March and mid-April may reflect a seasonal slowdown or a change in marketing strategy.
- The decline after the mid-November peak suggests a shift in marketing goals or campaigns.
- External factors such as events, seasonality or industry trends may explain part of the movement and should inform future marketing.
";

pub const INSTALLS: &str = "\
- Daily installs of our own and partner apps vary month to month across 2022.
- Installs dipped in January, March and April, rose from late May and trended upward from June to August, peaking around mid-November.
- After the peak, installs fluctuated and declined through the end of the year.
- The drivers behind the June to August growth are worth understanding so they can be repeated; the causes of the later decline may point to improvements.
- Comparing daily installs with competitors would clarify the product's market position.
";

pub const INSTALLS_BY_COUNTRY: &str = "\
- The chart shows each country's share of total installs.
- A single country accounts for the majority of installs and is the natural target for further marketing and growth.
- Countries with small shares may hold untapped growth potential.
- Understanding why the leading country performs so well, and comparing against earlier periods or similar products, would sharpen these conclusions.
";

pub const INSTALLS_BY_APP: &str = "\
- The chart shows each app's share of total installs, largest first.
- A handful of apps account for a large share of installs and may merit further investment or promotion.
- The long tail of apps with small shares indicates room for growth and improvement.
- App type and target audience should be considered when reading these shares.
";

pub const PAYOUTS: &str = "\
- Daily payouts trend upward over 2022, consistent with a growing number of users installing our or our partners' apps.
- Fluctuations do not follow a consistent or seasonal pattern and may stem from market changes, user behavior or payout policy changes.
- The payout strategy appears to attract and retain users; its long-term sustainability deserves further analysis.
";

pub const REVENUE: &str = "\
- Daily revenue is fairly consistent through the year, with notable exceptions.
- Revenue dips well below average in mid-April, early June, mid-October and late December, and spikes in late February, late May, late July and mid-November.
- Revenue trends down toward year end, with the lowest days in late December.
- The wide daily range points to high variability in the factors that drive revenue; the best and worst days merit investigation.
";

pub const TOTALS: &str = "\
- Total revenue, payouts and ads spend are compared side by side.
- Revenue exceeds the combined spend on advertising and payouts.
- Ads spend is far larger than payouts, reflecting heavy investment in advertising to generate revenue.
- Optimizing advertising campaigns may reduce cost without materially affecting revenue; comparing the margin with industry peers would add context.
";

pub const COMPOSITION: &str = "\
- The donut chart breaks the year into revenue, payouts, ads spend and profit.
- Ads spend is the most significant expense; payouts are comparatively small.
- The business is profitable despite substantial ads spend; more cost-effective advertising and investment in growth areas could improve it further.
";

pub const DAILY_COMPOSITE: &str = "\
- Daily revenue and daily ads spend move together, suggesting advertising is a significant driver of revenue. Channel performance, creatives and audience targeting are the levers to optimize.
- Declines in both revenue and ads spend may indicate changing market conditions or consumer behavior and warrant market research.
- Daily payouts are steady, reflecting regular obligations that should be reviewed for savings.
";

pub const DAILY_PROFIT: &str = "\
- Daily profit rises early in the year, then drops sharply and fluctuates at a lower level.
- The early rise may reflect successful campaigns or launches; the decline may reflect market conditions, competition or operational issues.
- Identifying the causes of these swings, and the impact of any responses to them, will support better decisions.
";

pub const SWOT: &str = "\
### SWOT Analysis
#### Strengths
- The payout strategy appears to attract and retain users.
- A few apps are particularly popular and form a strong base for investment and promotion.
- Daily revenue is consistent, indicating a stable and profitable business model.
#### Weaknesses
- Ad spend and installs fluctuate, suggesting issues with marketing strategy or sensitivity to external factors.
- Installs rely heavily on one country.
- Many apps hold small shares of installs.
#### Opportunities
- Install and spend fluctuations can reveal marketing approaches better aligned with user behavior.
- Countries with small install shares offer room for expansion and diversification.
- Popular apps can anchor new features or products for the same audience.
#### Threats
- Changes in the competitive landscape.
- Shifts in consumer behavior or industry trends affecting installs and ad spend.
- Political or economic changes in the dominant install country.
";

pub const CONCLUSIONS: &str = "\
### Conclusions
- The analysis highlights the company's performance and the areas with room for improvement.
- Fluctuations in ad spend, installs and payouts show why these metrics must be monitored over time.
- The payout strategy and consistent daily revenue suggest a healthy financial position.
- Understanding the causes of the fluctuations will guide investment in marketing and product development.
";

pub const NEXT_STEPS: &str = "\
### Next Steps
- Analyze external factors such as seasonality, industry trends and consumer behavior that influence ad spend and installs.
- Investigate the decline in installs after the mid-November peak.
- Investigate why the leading country dominates installs.
- Identify growth opportunities among apps with small install shares.
- Assess the drivers and long-term sustainability of the payout strategy.
- Keep monitoring installs, ad spend, payouts and revenue.
";
