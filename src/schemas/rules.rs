use rust_decimal::Decimal;
use std::str::FromStr;

pub fn check_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("must be at least {} characters", min));
    }
    if len > max {
        return Err(format!("must be at most {} characters", max));
    }
    Ok(())
}

pub fn check_min(value: i64, min: i64) -> Result<(), String> {
    if value < min {
        return Err(format!("must be at least {}", min));
    }
    Ok(())
}

/// Lightweight address check: one `@`, non-empty local part, dotted domain.
pub fn check_email(value: &str) -> Result<(), String> {
    check_length(value, 6, 60)?;
    let (local, domain) = value.split_once('@').ok_or_else(|| "must be a valid email address".to_string())?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}

pub fn check_url(value: &str) -> Result<(), String> {
    match url::Url::parse(value) {
        Ok(url) if url.has_host() => Ok(()),
        _ => Err("must be a valid URL".to_string()),
    }
}

/// Equity is a fraction of the company: a decimal in `0..=1`.
pub fn check_equity(value: &str) -> Result<Decimal, String> {
    let equity = Decimal::from_str(value.trim()).map_err(|_| "must be a decimal number".to_string())?;
    if equity < Decimal::ZERO || equity > Decimal::ONE {
        return Err("must be between 0 and 1".to_string());
    }
    Ok(equity)
}

/// Company handles are URL slugs.
pub fn check_handle(value: &str) -> Result<(), String> {
    check_length(value, 1, 25)?;
    if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_') {
        return Err("may only contain lowercase letters, digits, hyphen and underscore".to_string());
    }
    Ok(())
}
