use actix_session::Session;

use crate::errors::AppError;

const USER_ID: &str = "admin_id";
const USERNAME: &str = "username";
const FLASH: &str = "flash";

pub fn get_admin_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID).unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, AppError> {
    match session.get::<String>(USERNAME) {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err(AppError::Session("No username in session".to_string())),
        Err(e) => Err(AppError::Session(e.to_string())),
    }
}

/// Store the signed-in admin. The session id is renewed first.
pub fn sign_in(session: &Session, admin_id: i64, username: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID, admin_id)
        .and_then(|_| session.insert(USERNAME, username))
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn is_signed_in(session: &Session) -> bool {
    get_admin_id(session).is_some()
}

pub fn set_flash(session: &Session, msg: &str) {
    if let Err(e) = session.insert(FLASH, msg) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}
