/// Indicative monthly subscription price for well-known streaming services.
pub fn subscription_price(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "Netflix" => Some("$6.99/mo"),
        "Hulu" => Some("$7.99/mo"),
        "Disney Plus" => Some("$7.99/mo"),
        "HBO Max" => Some("$15.99/mo"),
        "Amazon Prime Video" => Some("$8.99/mo"),
        "Paramount Plus" => Some("$5.99/mo"),
        "Apple TV Plus" => Some("$6.99/mo"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_providers() {
        assert_eq!(subscription_price("HBO Max"), Some("$15.99/mo"));
        assert_eq!(subscription_price("Videoland"), None);
    }
}
