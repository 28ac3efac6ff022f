//! Yearly repayment schedules for grace-period loans.

pub mod cache;
pub mod generator;

pub use cache::ScheduleCache;
pub use generator::{
    equal_principal_split, generate_schedule, model_repayment_plan, LoanSchedule, LoanTerms,
    RepaymentPlan, ScheduleRow,
};
