//! 字段校验
//! 邮箱、名称、密码的基础格式检查

use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("invalid email regex")
});

/// 校验邮箱格式
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid email address.".to_string(),
        ))
    }
}

/// 校验资源名称：非空且至少包含一个字母
pub fn validate_name(name: &str, field: &str) -> Result<(), AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty.", field)));
    }
    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(format!(
            "{} must contain at least one letter.",
            field
        )));
    }
    Ok(())
}

/// 校验密码：最小长度且仅含字母数字
pub fn validate_password(password: &str, min_length: usize) -> Result<(), AppError> {
    if password.len() < min_length {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters.",
            min_length
        )));
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(
            "Password must contain only letters and digits.".to_string(),
        ));
    }
    Ok(())
}
