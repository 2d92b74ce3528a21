use crate::{
    modules::common::validators::{REGEX_IS_PHONE_NUMBER, REGEX_IS_REGISTRATION_ID},
    storage::models::VehicleKind,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn is_supported_driver_kind(kind: &str) -> Result<(), ValidationError> {
    let allowed_kinds = VehicleKind::to_string_vec();

    if !allowed_kinds.contains(&String::from(kind)) {
        return Err(ValidationError::new("kind not allowed"));
    }

    Ok(())
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// vehicle kind the driver is licensed for, "bus" or "ambulance"
    #[validate(custom = "is_supported_driver_kind")]
    pub kind: String,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(regex(
        path = "REGEX_IS_REGISTRATION_ID",
        message = "registration id must be 4 to 20 alphanumeric characters"
    ))]
    pub registration_id: String,

    #[validate(regex(path = "REGEX_IS_PHONE_NUMBER", message = "phone must be 10 digits"))]
    pub phone: String,
}
