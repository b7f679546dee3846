use crate::engine::plan::PayoutPlan;

/// Notification boundary. Implementations own delivery (push, email);
/// the engine only reports lifecycle moments.
pub trait PlanHooks {
    fn on_installment_completed(&mut self, _plan: &PayoutPlan) {}
    fn on_plan_expiring_soon(&mut self, _plan: &PayoutPlan) {}
}

/// Hook sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHooks;

impl PlanHooks for NullHooks {}
