//! The best/worst/average case split shared by the analysis and resolution
//! sections.

use super::model::CaseType;

/// The three distinct cases of a differentiated analysis.
///
/// Any of the three may be absent when the backend (or a cached record) did
/// not describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseTriple<T> {
    pub best: Option<T>,
    pub worst: Option<T>,
    pub average: Option<T>,
}

impl<T> Default for CaseTriple<T> {
    fn default() -> Self {
        Self {
            best: None,
            worst: None,
            average: None,
        }
    }
}

impl<T> CaseTriple<T> {
    /// Returns the case stored for `case_type`.
    pub fn get(&self, case_type: CaseType) -> Option<&T> {
        match case_type {
            CaseType::Best => self.best.as_ref(),
            CaseType::Worst => self.worst.as_ref(),
            CaseType::Average => self.average.as_ref(),
        }
    }

    /// Returns true when none of the three cases is present.
    pub fn is_empty(&self) -> bool {
        self.best.is_none() && self.worst.is_none() && self.average.is_none()
    }
}

/// Either one unified complexity behaviour or three distinct behaviours.
///
/// The wire format carries a `has_different_cases` flag next to four optional
/// fields. Here the flag *is* the variant, so a value can never carry both a
/// unified case and a best/worst/average triple.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseSplit<T> {
    /// `has_different_cases == false`
    Unified(Option<T>),
    /// `has_different_cases == true`
    Distinct(CaseTriple<T>),
}

impl<T> Default for CaseSplit<T> {
    fn default() -> Self {
        Self::Unified(None)
    }
}

impl<T> CaseSplit<T> {
    /// Builds a split from wire parts, keeping only the side the flag selects.
    pub fn from_parts(has_different_cases: bool, unified: Option<T>, triple: CaseTriple<T>) -> Self {
        if has_different_cases {
            Self::Distinct(triple)
        } else {
            Self::Unified(unified)
        }
    }

    /// Splits back into wire parts. The side not selected by the flag is empty.
    pub fn into_parts(self) -> (bool, Option<T>, CaseTriple<T>) {
        match self {
            Self::Unified(unified) => (false, unified, CaseTriple::default()),
            Self::Distinct(triple) => (true, None, triple),
        }
    }

    pub fn has_different_cases(&self) -> bool {
        matches!(self, Self::Distinct(_))
    }

    /// The unified case, if this split is unified and the case is present.
    pub fn unified(&self) -> Option<&T> {
        match self {
            Self::Unified(unified) => unified.as_ref(),
            Self::Distinct(_) => None,
        }
    }

    /// The distinct case for `case_type`; always `None` on a unified split.
    pub fn case(&self, case_type: CaseType) -> Option<&T> {
        match self {
            Self::Unified(_) => None,
            Self::Distinct(triple) => triple.get(case_type),
        }
    }

    /// Present cases in display order, tagged with their case type.
    ///
    /// The unified case is tagged `None`.
    pub fn present(&self) -> Vec<(Option<CaseType>, &T)> {
        match self {
            Self::Unified(unified) => unified.iter().map(|case| (None, case)).collect(),
            Self::Distinct(triple) => CaseType::ALL
                .iter()
                .filter_map(|case_type| triple.get(*case_type).map(|case| (Some(*case_type), case)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Unified(unified) => unified.is_none(),
            Self::Distinct(triple) => triple.is_empty(),
        }
    }
}
