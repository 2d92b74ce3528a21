use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRfidDeviceDto {
    /// hardware id the reader sends on every scan
    #[validate(length(min = 1, max = 64))]
    pub rfid_id: String,

    /// name of the spot the reader is mounted at, eg: "MAIN GATE"
    #[validate(length(min = 1, max = 100))]
    pub location_name: String,
}
