//! Shared building blocks for the product store binaries and crates:
//! logging setup, runtime environment checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok"}));
    }
}
