use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches campus fleet numbers (format: two to four uppercase blocks
    /// joined by dashes, eg: OD-02-BX-1234)
    pub static ref REGEX_IS_FLEET_NUMBER: Regex =
        Regex::new(r"^[A-Z0-9]{1,4}(-[A-Z0-9]{1,4}){1,3}$").unwrap();
    //
    pub static ref REGEX_IS_PHONE_NUMBER: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    //
    pub static ref REGEX_IS_REGISTRATION_ID: Regex =
        Regex::new(r"^[A-Za-z0-9/-]{4,20}$").unwrap();
}
