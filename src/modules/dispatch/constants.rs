use strum::Display;

/// digits in the code issued to the driver at acceptance time
pub const OTP_LENGTH: usize = 6;

/// place code riders pick when their location is none of the known
/// campus points, requires free text details on the booking
pub const OTHER_PLACE_CODE: &str = "6";

/// The campus pickup points riders can choose from when booking a
/// ambulance, keyed by the short codes the booking form submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PickupPlace {
    BaitaraniHall,
    BaladevjewHall,
    MaaTariniHall,
    GandhamardanHall,
    AdminBlock,
    Other,
}

impl PickupPlace {
    pub fn from_code(code: &str) -> Option<PickupPlace> {
        match code {
            "1" => Some(PickupPlace::BaitaraniHall),
            "2" => Some(PickupPlace::BaladevjewHall),
            "3" => Some(PickupPlace::MaaTariniHall),
            "4" => Some(PickupPlace::GandhamardanHall),
            "5" => Some(PickupPlace::AdminBlock),
            OTHER_PLACE_CODE => Some(PickupPlace::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PickupPlace::BaitaraniHall => "BAITARANI HALL",
            PickupPlace::BaladevjewHall => "BALADEVJEW HALL",
            PickupPlace::MaaTariniHall => "MAA TARINI HALL",
            PickupPlace::GandhamardanHall => "GANDHAMARDAN HALL",
            PickupPlace::AdminBlock => "ADMIN BLOCK",
            PickupPlace::Other => "Other",
        }
    }
}
