mod collaboration;
mod entry;
mod period;

pub use collaboration::{
    Collaboration, CollaborationSettings, Member, MemberStatus, Role, UserProfile, UserRef,
    Visibility,
};
pub use entry::{parse_amount, parse_date, ExpenseEntry, IncomeEntry, PaymentStatus};
pub use period::{month_name, PeriodSelection, ReportPeriod};
