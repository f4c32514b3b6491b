use async_trait::async_trait;
use bookdesk_core::{
    lookup::AvailabilityLookup,
    models::{booking::ExistingBooking, staff::StaffDay},
};
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

// Mock availability store for testing
mock! {
    pub AvailabilityStore {}

    #[async_trait]
    impl AvailabilityLookup for AvailabilityStore {
        async fn staff_exists(&self, staff_id: Uuid) -> eyre::Result<bool>;

        async fn service_duration(&self, service_id: Uuid) -> eyre::Result<Option<u32>>;

        async fn staff_day(&self, staff_id: Uuid, date: NaiveDate) -> eyre::Result<StaffDay>;

        async fn bookings_for(
            &self,
            staff_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<ExistingBooking>>;
    }
}
