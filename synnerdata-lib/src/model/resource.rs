//! Resource enum for the Synnerdata REST collections

use std::str::FromStr;

/// A REST collection exposed by the Synnerdata backend.
///
/// Every management page lists one of these resources in a table. The
/// variants map to path segments under the API prefix; [`Resource::Custom`]
/// is the escape hatch for collections this enum does not know about.
///
/// # Examples
///
/// ```
/// use synnerdata_lib::model::Resource;
///
/// assert_eq!(Resource::CostCenters.path(), "cost-centers");
/// assert_eq!("epis".parse::<Resource>().unwrap(), Resource::Epis);
/// assert_eq!(Resource::custom("payroll").path(), "payroll");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Companies,
    Branches,
    Users,
    Employees,
    Departments,
    CostCenters,
    Roles,
    Projects,
    /// Personal protective equipment (EPI) catalog.
    Epis,
    /// EPI handed out to employees.
    EpiDeliveries,
    Absences,
    Warnings,
    Accidents,
    MedicalCertificates,
    Vacations,
    Promotions,
    Terminations,
    LaborActions,
    CpfAnalyses,
    /// Any other collection, used verbatim as the path segment.
    Custom(String),
}

impl Resource {
    /// Every built-in resource, in menu order.
    pub const ALL: [Resource; 19] = [
        Resource::Companies,
        Resource::Branches,
        Resource::Users,
        Resource::Employees,
        Resource::Departments,
        Resource::CostCenters,
        Resource::Roles,
        Resource::Projects,
        Resource::Epis,
        Resource::EpiDeliveries,
        Resource::Absences,
        Resource::Warnings,
        Resource::Accidents,
        Resource::MedicalCertificates,
        Resource::Vacations,
        Resource::Promotions,
        Resource::Terminations,
        Resource::LaborActions,
        Resource::CpfAnalyses,
    ];

    /// Creates a resource from an arbitrary path segment.
    pub fn custom(path: impl Into<String>) -> Self {
        Self::Custom(path.into())
    }

    /// Returns the URL path segment for this resource.
    pub fn path(&self) -> &str {
        match self {
            Self::Companies => "companies",
            Self::Branches => "branches",
            Self::Users => "users",
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::CostCenters => "cost-centers",
            Self::Roles => "roles",
            Self::Projects => "projects",
            Self::Epis => "epis",
            Self::EpiDeliveries => "epi-deliveries",
            Self::Absences => "absences",
            Self::Warnings => "warnings",
            Self::Accidents => "accidents",
            Self::MedicalCertificates => "medical-certificates",
            Self::Vacations => "vacations",
            Self::Promotions => "promotions",
            Self::Terminations => "terminations",
            Self::LaborActions => "labor-actions",
            Self::CpfAnalyses => "cpf-analyses",
            Self::Custom(path) => path,
        }
    }

    /// Returns `true` for workplace occurrences recorded against an employee.
    pub fn is_occurrence(&self) -> bool {
        matches!(
            self,
            Self::Absences
                | Self::Warnings
                | Self::Accidents
                | Self::MedicalCertificates
                | Self::Vacations
                | Self::Promotions
                | Self::Terminations
                | Self::LaborActions
                | Self::CpfAnalyses
                | Self::EpiDeliveries
        )
    }

    /// Returns `true` if the collection is listed per company.
    pub fn is_company_scoped(&self) -> bool {
        !matches!(self, Self::Companies | Self::Custom(_))
    }
}

impl FromStr for Resource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(Resource::ALL
            .iter()
            .find(|r| r.path() == normalized)
            .cloned()
            .unwrap_or(Resource::Custom(s.trim().to_string())))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
