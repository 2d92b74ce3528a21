use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartTripDto {
    /// the vehicle going on the road, must be assigned and idle
    pub vehicle_id: Uuid,
}
