//! Repository traits and their SQL implementations, one pair per table.

pub mod checkin_record;
pub mod checkin_record_sql;
pub mod event;
pub mod event_sql;
pub mod factory;
pub mod profile;
pub mod profile_sql;
pub mod registration;
pub mod registration_sql;

pub use checkin_record::{CheckinRecord, CheckinRecordRepository};
pub use checkin_record_sql::SqlCheckinRecordRepository;
pub use event::{Event, EventRepository};
pub use event_sql::SqlEventRepository;
pub use factory::{CatalystRepositories, CatalystRepositoryFactory};
pub use profile::{ProfileRepository, Role};
pub use profile_sql::SqlProfileRepository;
pub use registration::{Registration, RegistrationRepository, RegistrationStatus};
pub use registration_sql::SqlRegistrationRepository;
