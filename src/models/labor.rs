use serde::{Deserialize, Serialize};

/// Staff counts of an organization, with optional payroll block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LaborData {
    pub total_staff_annual: Option<i64>,
    pub research_staff_internal: Option<i64>,
    pub core_operational_staff_internal: Option<i64>,
    pub admin_support_staff_internal: Option<i64>,
    pub research_staff_external: Option<i64>,
    pub core_operational_staff_external: Option<i64>,
    pub admin_support_staff_external: Option<i64>,
    /// `None` means the backend sent no payroll block at all
    pub fot: Option<LaborFot>,
}

/// Payroll (wage fund) figures, same shape as the staff counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LaborFot {
    pub total_staff_annual: Option<i64>,
    pub research_staff_internal: Option<i64>,
    pub core_operational_staff_internal: Option<i64>,
    pub admin_support_staff_internal: Option<i64>,
    pub research_staff_external: Option<i64>,
    pub core_operational_staff_external: Option<i64>,
    pub admin_support_staff_external: Option<i64>,
}

impl LaborData {
    pub fn rows(&self) -> [(&'static str, Option<i64>); 7] {
        [
            ("Total staff", self.total_staff_annual),
            ("Research staff (internal)", self.research_staff_internal),
            ("Core staff (internal)", self.core_operational_staff_internal),
            ("Admin staff (internal)", self.admin_support_staff_internal),
            ("Research staff (external)", self.research_staff_external),
            ("Core staff (external)", self.core_operational_staff_external),
            ("Admin staff (external)", self.admin_support_staff_external),
        ]
    }
}

impl LaborFot {
    pub fn rows(&self) -> [(&'static str, Option<i64>); 7] {
        [
            ("Payroll, total", self.total_staff_annual),
            ("Payroll, research (internal)", self.research_staff_internal),
            ("Payroll, core (internal)", self.core_operational_staff_internal),
            ("Payroll, admin (internal)", self.admin_support_staff_internal),
            ("Payroll, research (external)", self.research_staff_external),
            ("Payroll, core (external)", self.core_operational_staff_external),
            ("Payroll, admin (external)", self.admin_support_staff_external),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_field_order() {
        let labor = LaborData {
            total_staff_annual: Some(40),
            admin_support_staff_external: Some(2),
            ..Default::default()
        };
        let rows = labor.rows();
        assert_eq!(rows[0], ("Total staff", Some(40)));
        assert_eq!(rows[1].1, None);
        assert_eq!(rows[6], ("Admin staff (external)", Some(2)));
    }

    #[test]
    fn test_empty_fot_differs_from_missing_fot() {
        let missing = LaborData::default();
        let empty = LaborData {
            fot: Some(LaborFot::default()),
            ..Default::default()
        };
        assert_ne!(missing, empty);
    }
}
