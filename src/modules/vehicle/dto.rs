use crate::{modules::common::validators::REGEX_IS_FLEET_NUMBER, storage::models::VehicleKind};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

fn is_supported_vehicle_kind(kind: &str) -> Result<(), ValidationError> {
    let allowed_kinds = VehicleKind::to_string_vec();

    if !allowed_kinds.contains(&String::from(kind)) {
        return Err(ValidationError::new("kind not allowed"));
    }

    Ok(())
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleDto {
    #[validate(regex(
        path = "REGEX_IS_FLEET_NUMBER",
        message = "number must be uppercase blocks joined by dashes, eg: OD-02-BX-1234"
    ))]
    pub number: String,

    /// id of the GPS device installed on the vehicle
    #[validate(length(min = 1, max = 64))]
    pub gps_device_id: String,

    /// "bus" or "ambulance"
    #[validate(custom = "is_supported_vehicle_kind")]
    pub kind: String,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDriverDto {
    pub driver_id: Uuid,
}

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetOutOfStationDto {
    pub out_of_station: bool,
}
