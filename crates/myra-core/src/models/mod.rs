pub mod agreement;
pub mod agreement_type;
pub mod client;
pub mod district;
pub mod grazing;
pub mod livestock_identifier;
pub mod plan;
pub mod reference;
pub mod usage;
pub mod zone;

pub use agreement::Agreement;
pub use agreement_type::AgreementType;
pub use client::ClientAssociation;
pub use district::District;
pub use grazing::{GrazingSchedule, GrazingScheduleEntry, Pasture};
pub use livestock_identifier::LivestockIdentifier;
pub use plan::{Plan, PlanStatus};
pub use reference::RefRecord;
pub use usage::Usage;
pub use zone::Zone;
