use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

/// 用户名：4 到 32 个字符，字母、数字、下划线或连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !(4..=32).contains(&username.chars().count()) {
        return Err("Username length must be between 4 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid slug regex"));

/// 组织标识：小写字母、数字和连字符，2 到 64 个字符
pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    if slug.len() < 2 || slug.len() > 64 {
        return Err("Slug length must be between 2 and 64 characters");
    }
    if !SLUG_RE.is_match(slug) {
        return Err("Slug must contain only lowercase letters, digits and single hyphens");
    }
    Ok(())
}

/// 解析 `HH:MM`，返回自零点起的分钟数
pub fn parse_hhmm(value: &str) -> Result<u32, &'static str> {
    let (h, m) = value
        .split_once(':')
        .ok_or("Time must use the HH:MM format")?;
    if h.len() != 2 || m.len() != 2 {
        return Err("Time must use the HH:MM format");
    }
    let hours: u32 = h.parse().map_err(|_| "Time must use the HH:MM format")?;
    let minutes: u32 = m.parse().map_err(|_| "Time must use the HH:MM format")?;
    if hours > 23 || minutes > 59 {
        return Err("Time is out of range");
    }
    Ok(hours * 60 + minutes)
}

/// 起止时间均为 `HH:MM` 且开始早于结束
pub fn validate_time_range(start: &str, end: &str) -> Result<(), &'static str> {
    if parse_hhmm(start)? >= parse_hhmm(end)? {
        return Err("Start time must be before end time");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "qwerty123",
    "admin1234",
    "abcd1234",
    "welcome1",
    "school123",
    "teacher123",
];

/// 密码规则：至少 8 个字符，包含大小写字母与数字，不能是常见密码
const PASSWORD_RULES: &[(fn(&str) -> bool, &str)] = &[
    (
        |p: &str| p.chars().count() >= 8,
        "Password must be at least 8 characters long",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_uppercase()),
        "Password must contain at least one uppercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_lowercase()),
        "Password must contain at least one lowercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_digit()),
        "Password must contain at least one digit",
    ),
    (
        |p: &str| !COMMON_PASSWORDS.iter().any(|w| p.eq_ignore_ascii_case(w)),
        "Password is too common, please choose a stronger password",
    ),
];

/// 返回所有未满足的规则，多条以分号连接
pub fn validate_password(password: &str) -> Result<(), String> {
    let violations: Vec<&str> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, message)| *message)
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("admin_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("head@school.org").is_ok());
        assert!(validate_email("no-at-sign.org").is_err());
    }

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("green-valley").is_ok());
        assert!(validate_slug("school42").is_ok());
        assert!(validate_slug("Green-Valley").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("x").is_err());
    }

    #[test]
    fn test_hhmm_parsing() {
        assert_eq!(parse_hhmm("08:30"), Ok(510));
        assert_eq!(parse_hhmm("00:00"), Ok(0));
        assert!(parse_hhmm("8:30").is_err());
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("noon").is_err());
    }

    #[test]
    fn test_time_range() {
        assert!(validate_time_range("08:00", "08:45").is_ok());
        assert_eq!(
            validate_time_range("09:00", "09:00"),
            Err("Start time must be before end time")
        );
        assert!(validate_time_range("10:00", "09:00").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("Kh4nAcademy").is_ok());

        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
        assert!(err.contains("digit"));
        assert!(!err.contains("lowercase"));

        assert_eq!(
            validate_password("School123"),
            Err("Password is too common, please choose a stronger password".to_string())
        );
    }
}
