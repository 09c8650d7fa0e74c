/// Operator supplied numbers sent along with every optimization request.
///
/// Values are forwarded verbatim; keeping them non-negative is the job of
/// whatever surface collects them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FleetParams {
    pub num_vehicles: u32,
    /// Total cargo weight in kilograms
    pub total_weight: f64,
    pub daily_customers: u32,
}
