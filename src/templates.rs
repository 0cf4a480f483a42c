//! Tera template engine with the built-in status page templates.

use tera::Tera;

use crate::error::AppError;

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Initialize the Tera template engine with the built-in templates
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("index.html", INDEX_TEMPLATE),
    ])?;

    tera.register_filter("status_class", status_class_filter);

    Ok(tera)
}

/// Map a status string to the CSS class used for its badge
fn status_class_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let status = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("status_class filter expects a string"))?;

    let class = match status {
        "Healthy" => "status-healthy",
        "Unknown" => "status-unknown",
        _ => "status-degraded",
    };
    Ok(tera::Value::String(class.to_string()))
}
