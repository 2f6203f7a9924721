//! Tera templates for the HTML pages, compiled into the binary.

use std::collections::HashMap;

use tera::{Context, Tera, Value};
use tracker_core::chart::{format_count, format_number, format_rate};

/// The page templates plus the number-formatting filters they use.
pub struct Templates {
  tera: Tera,
}

impl Templates {
  pub fn new() -> tera::Result<Self> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
      ("base.html", include_str!("../templates/base.html")),
      ("index.html", include_str!("../templates/index.html")),
      ("chart.html", include_str!("../templates/chart.html")),
      ("all_states.html", include_str!("../templates/all_states.html")),
    ])?;
    tera.register_filter("count", number_filter(format_count));
    tera.register_filter("compact", number_filter(format_number));
    tera.register_filter("rate", number_filter(format_rate));
    Ok(Self { tera })
  }

  pub fn render(&self, name: &str, context: &Context) -> tera::Result<String> {
    self.tera.render(name, context)
  }
}

/// Adapt an `f64` formatter into a Tera filter.
fn number_filter(
  format: fn(f64) -> String,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
  move |value, _args| {
    let n = value
      .as_f64()
      .ok_or_else(|| tera::Error::msg(format!("expected a number, got {value}")))?;
    Ok(Value::String(format(n)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn templates_compile() {
    assert!(Templates::new().is_ok());
  }

  #[test]
  fn filters_format_numbers() {
    let mut tera = Tera::default();
    tera
      .add_raw_template("t", "{{ a | count }} {{ b | compact }} {{ c | rate }}")
      .unwrap();
    tera.register_filter("count", number_filter(format_count));
    tera.register_filter("compact", number_filter(format_number));
    tera.register_filter("rate", number_filter(format_rate));

    let mut ctx = Context::new();
    ctx.insert("a", &1234567.0);
    ctx.insert("b", &2_500_000.0);
    ctx.insert("c", &85.0);
    assert_eq!(tera.render("t", &ctx).unwrap(), "1,234,567 2.5M 85.0");
  }
}
