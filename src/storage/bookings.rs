use super::{
    error::DispatchError,
    models::{Booking, BookingStatus},
    FleetStore,
};
use uuid::Uuid;

impl FleetStore {
    pub async fn insert_booking(&self, booking: Booking) {
        self.bookings.write().await.insert(booking.id, booking);
    }

    pub async fn booking(&self, booking_id: Uuid) -> Option<Booking> {
        self.bookings.read().await.get(&booking_id).cloned()
    }

    /// pending bookings oldest first, the order polling drivers see them in
    pub async fn pending_bookings(&self) -> Vec<Booking> {
        let mut pending: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.status == BookingStatus::Pending)
            .cloned()
            .collect();

        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        pending
    }

    /// The acceptance compare and swap: `pending -> accepted`.
    ///
    /// the status check and the mutation happen under the same write guard,
    /// so when drivers race for a booking exactly one call sees `pending`
    /// and wins, every other caller gets `AlreadyAccepted` and must not retry
    pub async fn accept_booking(
        &self,
        booking_id: Uuid,
        driver_id: Uuid,
        vehicle_id: Uuid,
        otp: String,
        eta_minutes: Option<u32>,
    ) -> Result<Booking, DispatchError> {
        let mut bookings = self.bookings.write().await;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(DispatchError::BookingNotFound)?;

        if booking.status != BookingStatus::Pending {
            return Err(DispatchError::AlreadyAccepted);
        }

        booking.status = BookingStatus::Accepted;
        booking.driver_id = Some(driver_id);
        booking.vehicle_id = Some(vehicle_id);
        booking.otp = Some(otp);
        booking.eta_minutes = eta_minutes;

        Ok(booking.clone())
    }

    /// The OTP gate: `accepted -> in_progress` on a exact code match.
    ///
    /// a mismatch leaves the booking accepted, there is no attempt limit
    pub async fn verify_booking_otp(
        &self,
        booking_id: Uuid,
        code: &str,
    ) -> Result<Booking, DispatchError> {
        let mut bookings = self.bookings.write().await;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(DispatchError::BookingNotFound)?;

        if booking.status != BookingStatus::Accepted {
            return Err(DispatchError::NotAccepted);
        }

        if booking.otp.as_deref() != Some(code) {
            return Err(DispatchError::InvalidOtp);
        }

        booking.status = BookingStatus::InProgress;

        Ok(booking.clone())
    }

    /// `accepted -> cancelled` by the bound driver, the booking is dead
    /// afterwards and is never offered to another driver
    pub async fn abort_booking(
        &self,
        booking_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Booking, DispatchError> {
        let mut bookings = self.bookings.write().await;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(DispatchError::BookingNotFound)?;

        if booking.status != BookingStatus::Accepted {
            return Err(DispatchError::NotAccepted);
        }

        if booking.driver_id != Some(driver_id) {
            return Err(DispatchError::NotBookingDriver);
        }

        booking.status = BookingStatus::Cancelled;

        Ok(booking.clone())
    }

    /// `in_progress -> completed` by the bound driver
    pub async fn complete_booking(
        &self,
        booking_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Booking, DispatchError> {
        let mut bookings = self.bookings.write().await;

        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(DispatchError::BookingNotFound)?;

        if booking.status != BookingStatus::InProgress {
            return Err(DispatchError::NotInProgress);
        }

        if booking.driver_id != Some(driver_id) {
            return Err(DispatchError::NotBookingDriver);
        }

        booking.status = BookingStatus::Completed;

        Ok(booking.clone())
    }

    /// refreshes the pickup estimate of a booking that is still being
    /// served, terminal and pending bookings are left untouched
    pub async fn update_booking_eta(
        &self,
        booking_id: Uuid,
        eta_minutes: u32,
    ) -> Option<Booking> {
        let mut bookings = self.bookings.write().await;

        let booking = bookings.get_mut(&booking_id)?;

        if !matches!(
            booking.status,
            BookingStatus::Accepted | BookingStatus::InProgress
        ) {
            return None;
        }

        booking.eta_minutes = Some(eta_minutes);

        Some(booking.clone())
    }

    /// the booking a ambulance is currently serving, if any
    pub async fn engaged_booking_for_vehicle(&self, vehicle_id: Uuid) -> Option<Booking> {
        self.bookings
            .read()
            .await
            .values()
            .find(|b| {
                b.vehicle_id == Some(vehicle_id)
                    && matches!(
                        b.status,
                        BookingStatus::Accepted | BookingStatus::InProgress
                    )
            })
            .cloned()
    }
}
