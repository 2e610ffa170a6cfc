//! Element id conventions shared with the dashboard markup.

pub fn value(device: &str) -> String {
    format!("value_{}", device)
}

pub fn field(device: &str, key: &str) -> String {
    format!("{}_{}", device, key)
}

pub fn field_trend(device: &str, key: &str) -> String {
    format!("trend_{}_{}", device, key)
}

pub fn trend(device: &str) -> String {
    format!("trend_{}", device)
}

pub fn humidity(device: &str) -> String {
    format!("humidity_{}", device)
}
