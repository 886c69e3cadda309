use crate::error::ValidationError;

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 256;

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

pub fn login(email: &str, password: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    require("password", password)
}

pub fn signup(
    name: &str,
    email: &str,
    password: &str,
    repeat_password: &str,
) -> Result<(), ValidationError> {
    require("name", name)?;
    require("email", email)?;
    require("password", password)?;
    require("repeated password", repeat_password)?;
    if password != repeat_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn password_reset(old_password: &str, new_password: &str) -> Result<(), ValidationError> {
    require("old password", old_password)?;
    let len = new_password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::PasswordLength {
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }
    if old_password == new_password {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}

pub fn email_update(email: &str, current_password: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    require("current password", current_password)
}

pub fn name_update(name: &str) -> Result<(), ValidationError> {
    require("name", name)
}
