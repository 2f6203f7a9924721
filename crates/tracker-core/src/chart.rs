//! Chart-series assembly and number formatting.
//!
//! [`ChartSeries`] is the renderer-agnostic description of the per-state bar
//! chart. The PNG renderer in `tracker-web` draws the bars from it; the page
//! template prints the title, legend and tick labels.

use serde::Serialize;

use crate::record::Record;

// ─── Categories & colours ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesColor {
  Green,
  Blue,
  Orange,
  Red,
}

impl SeriesColor {
  pub fn name(self) -> &'static str {
    match self {
      SeriesColor::Green => "green",
      SeriesColor::Blue => "blue",
      SeriesColor::Orange => "orange",
      SeriesColor::Red => "red",
    }
  }

  /// sRGB components, matching the CSS named colours.
  pub fn rgb(self) -> [u8; 3] {
    match self {
      SeriesColor::Green => [0, 128, 0],
      SeriesColor::Blue => [0, 0, 255],
      SeriesColor::Orange => [255, 165, 0],
      SeriesColor::Red => [255, 0, 0],
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
  Confirmed,
  Active,
  Recovered,
  Deaths,
}

impl Category {
  /// Display order of the bars.
  pub const ALL: [Category; 4] = [
    Category::Confirmed,
    Category::Active,
    Category::Recovered,
    Category::Deaths,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Category::Confirmed => "Confirmed",
      Category::Active => "Active",
      Category::Recovered => "Recovered",
      Category::Deaths => "Deaths",
    }
  }

  pub fn color(self) -> SeriesColor {
    match self {
      Category::Confirmed => SeriesColor::Green,
      Category::Active => SeriesColor::Blue,
      Category::Recovered => SeriesColor::Orange,
      Category::Deaths => SeriesColor::Red,
    }
  }

  fn count(self, record: &Record) -> f64 {
    match self {
      Category::Confirmed => record.confirmed,
      Category::Active => record.active,
      Category::Recovered => record.recovered,
      Category::Deaths => record.deaths,
    }
  }

  /// `None` for `Confirmed`, which is the base every rate is relative to.
  fn rate(self, record: &Record) -> Option<f64> {
    match self {
      Category::Confirmed => None,
      Category::Active => Some(record.active_rate()),
      Category::Recovered => Some(record.recovery_rate()),
      Category::Deaths => Some(record.death_rate()),
    }
  }

  fn legend(self, record: &Record) -> String {
    let count = format_count(self.count(record));
    match self.rate(record) {
      Some(rate) => format!("{}: {count} ({}%)", self.label(), format_rate(rate)),
      None => format!("{}: {count}", self.label()),
    }
  }
}

// ─── Series ──────────────────────────────────────────────────────────────────

/// One bar: label, height and fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEntry {
  pub label: &'static str,
  pub value: f64,
  pub color: SeriesColor,
}

/// A labelled horizontal grid line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
  pub value: f64,
  pub label: String,
}

/// Everything needed to draw the per-state bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
  pub title:   String,
  /// Confirmed, Active, Recovered, Deaths, in that order.
  pub entries: [SeriesEntry; 4],
  /// Same order as `entries`.
  pub legend:  [String; 4],
}

impl ChartSeries {
  pub fn from_record(record: &Record) -> Self {
    Self {
      title:   format!("COVID-19 Data for {}", record.state),
      entries: Category::ALL.map(|c| SeriesEntry {
        label: c.label(),
        value: c.count(record),
        color: c.color(),
      }),
      legend:  Category::ALL.map(|c| c.legend(record)),
    }
  }

  /// Tallest bar, or `0` when every value is zero (or negative).
  pub fn max_value(&self) -> f64 {
    self.entries.iter().map(|e| e.value).fold(0.0, f64::max)
  }

  /// `intervals + 1` evenly spaced ticks from zero to [`Self::max_value`],
  /// labelled with [`format_number`]. A chart with no positive value gets a
  /// single tick at zero.
  pub fn axis_ticks(&self, intervals: usize) -> Vec<AxisTick> {
    let max = self.max_value();
    if max <= 0.0 || intervals == 0 {
      return vec![AxisTick { value: 0.0, label: format_number(0.0) }];
    }
    let step = max / intervals as f64;
    (0..=intervals)
      .map(|i| {
        let value = step * i as f64;
        AxisTick { value, label: format_number(value) }
      })
      .collect()
  }
}

// ─── Formatting ──────────────────────────────────────────────────────────────

/// Compact axis label: `2.5M`, `1.5K`, or the truncated integer.
pub fn format_number(value: f64) -> String {
  if value >= 1_000_000.0 {
    format!("{:.1}M", value / 1_000_000.0)
  } else if value >= 1_000.0 {
    format!("{:.1}K", value / 1_000.0)
  } else {
    format!("{}", value.trunc() as i64)
  }
}

/// Count with `,` thousands separators. Integral values print without a
/// fractional part (`1,234`); others keep their shortest decimal form
/// (`1,234.5`).
pub fn format_count(value: f64) -> String {
  let text = value.to_string();
  let (sign, digits) = match text.strip_prefix('-') {
    Some(rest) => ("-", rest),
    None => ("", text.as_str()),
  };
  let (int_part, frac_part) = match digits.split_once('.') {
    Some((int_part, frac)) => (int_part, Some(frac)),
    None => (digits, None),
  };

  let mut out = String::with_capacity(text.len() + int_part.len() / 3);
  out.push_str(sign);
  for (i, ch) in int_part.chars().enumerate() {
    if i > 0 && (int_part.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  if let Some(frac) = frac_part {
    out.push('.');
    out.push_str(frac);
  }
  out
}

/// Percentage as printed in the legend: integral rates keep one decimal
/// (`10.0`), others print in shortest form (`33.33`).
pub fn format_rate(rate: f64) -> String {
  if rate.fract() == 0.0 {
    format!("{rate:.1}")
  } else {
    rate.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_number_thresholds() {
    assert_eq!(format_number(500.0), "500");
    assert_eq!(format_number(1500.0), "1.5K");
    assert_eq!(format_number(2_500_000.0), "2.5M");
    assert_eq!(format_number(999.9), "999");
    assert_eq!(format_number(1000.0), "1.0K");
    assert_eq!(format_number(0.0), "0");
  }

  #[test]
  fn format_count_groups_thousands() {
    assert_eq!(format_count(100.0), "100");
    assert_eq!(format_count(1234.0), "1,234");
    assert_eq!(format_count(1234567.0), "1,234,567");
    assert_eq!(format_count(1234.5), "1,234.5");
    assert_eq!(format_count(-4321.0), "-4,321");
  }

  #[test]
  fn format_rate_keeps_one_decimal_for_whole_numbers() {
    assert_eq!(format_rate(10.0), "10.0");
    assert_eq!(format_rate(0.0), "0.0");
    assert_eq!(format_rate(33.33), "33.33");
  }

  #[test]
  fn delhi_series() {
    let series = ChartSeries::from_record(&Record::new("Delhi", 100.0, 10.0, 85.0, 5.0));
    assert_eq!(series.title, "COVID-19 Data for Delhi");
    assert_eq!(
      series.legend,
      [
        "Confirmed: 100",
        "Active: 10 (10.0%)",
        "Recovered: 85 (85.0%)",
        "Deaths: 5 (5.0%)",
      ]
    );
    let labels: Vec<_> = series.entries.iter().map(|e| e.label).collect();
    assert_eq!(labels, ["Confirmed", "Active", "Recovered", "Deaths"]);
    let colors: Vec<_> = series.entries.iter().map(|e| e.color.name()).collect();
    assert_eq!(colors, ["green", "blue", "orange", "red"]);
    assert_eq!(series.entries[2].value, 85.0);
  }

  #[test]
  fn legend_with_zero_confirmed() {
    let series = ChartSeries::from_record(&Record::new("Empty", 0.0, 3.0, 0.0, 0.0));
    assert_eq!(series.legend[1], "Active: 3 (0.0%)");
  }

  #[test]
  fn axis_ticks_span_zero_to_max() {
    let series = ChartSeries::from_record(&Record::new("Big", 2_000_000.0, 0.0, 0.0, 0.0));
    let ticks = series.axis_ticks(4);
    let labels: Vec<_> = ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["0", "500.0K", "1.0M", "1.5M", "2.0M"]);
  }

  #[test]
  fn axis_ticks_for_empty_chart() {
    let series = ChartSeries::from_record(&Record::new("Zero", 0.0, 0.0, 0.0, 0.0));
    assert_eq!(series.max_value(), 0.0);
    assert_eq!(series.axis_ticks(5).len(), 1);
  }
}
