use crate::modules::common::validators::{REGEX_IS_PHONE_NUMBER, REGEX_IS_REGISTRATION_ID};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationDto {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    #[validate(regex(
        path = "REGEX_IS_REGISTRATION_ID",
        message = "registration id must be 4 to 20 alphanumeric characters"
    ))]
    pub student_registration_id: String,

    #[validate(regex(path = "REGEX_IS_PHONE_NUMBER", message = "phone must be 10 digits"))]
    pub phone: String,

    /// campus pickup point code, "6" is "other" and requires `place_details`
    #[validate(length(min = 1, max = 8))]
    pub place: String,

    #[validate(length(max = 200))]
    pub place_details: Option<String>,

    #[validate]
    pub user_location: UserLocationDto,
}

/// identifies the driver performing a accept / abort / complete call
#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingDriverDto {
    pub driver_id: Uuid,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpDto {
    /// compared against the issued OTP byte for byte, no normalization
    pub otp: String,
}
