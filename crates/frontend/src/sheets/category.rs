/// Functional type of a sheet/view. Determines which columns are
/// expected and which resolution/aggregation rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Primary training report (BC).
    Report,
    /// Operational/business-line log (NV), keyed by sub-tab.
    Operations,
    /// Leave/compensation matrix (BF).
    LeaveComp,
    /// Computed statistics (TH). Never stored remotely.
    Statistics,
    /// Plan matrix (KH).
    Plan,
}

impl Category {
    /// Keyword embedded in remote sheet names for this category.
    pub fn keyword(self) -> &'static str {
        match self {
            Category::Report => "BC",
            Category::Operations => "NV",
            Category::LeaveComp => "BF",
            Category::Statistics => "TH",
            Category::Plan => "KH",
        }
    }

    /// Statistics are computed from report data, so they resolve as
    /// the report category.
    pub fn resolve_as(self) -> Category {
        match self {
            Category::Statistics => Category::Report,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Report => "Báo Cáo",
            Category::Operations => "Nghiệp Vụ",
            Category::LeaveComp => "Bù Phép",
            Category::Statistics => "Thống Kê",
            Category::Plan => "Kế Hoạch",
        }
    }

    /// Calendar day-grid views: one row per person, one column per day.
    pub fn is_matrix(self) -> bool {
        matches!(self, Category::LeaveComp | Category::Plan)
    }

    /// Month/year tab row shown in the dashboard (NV lives on its own
    /// screen).
    pub const TABS: [Category; 4] = [
        Category::Report,
        Category::LeaveComp,
        Category::Statistics,
        Category::Plan,
    ];
}

/// Sub-tabs of the operational log, each mapping to a fixed sheet
/// keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationsTab {
    Mobile,
    Broadband,
    It,
    Online,
}

impl OperationsTab {
    pub fn keyword(self) -> &'static str {
        match self {
            OperationsTab::Mobile => "NV_DIDONG",
            OperationsTab::Broadband => "NV_BRCD",
            OperationsTab::It => "NV_CNTT",
            OperationsTab::Online => "NV_ONLINE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OperationsTab::Mobile => "Di động",
            OperationsTab::Broadband => "BRCĐ",
            OperationsTab::It => "CNTT",
            OperationsTab::Online => "ONLINE",
        }
    }

    pub const ALL: [OperationsTab; 4] = [
        OperationsTab::Mobile,
        OperationsTab::Broadband,
        OperationsTab::It,
        OperationsTab::Online,
    ];
}

/// Current user selection driving resolution and aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub category: Category,
    /// 1-12.
    pub month: u32,
    pub year: i32,
    pub operations_tab: OperationsTab,
    /// Yearly aggregate mode (statistics only): the loader switches to
    /// a twelve-month rollup instead of single-sheet resolution.
    pub yearly: bool,
}

impl Selection {
    pub fn new(category: Category, month: u32, year: i32) -> Self {
        Self {
            category,
            month,
            year,
            operations_tab: OperationsTab::Mobile,
            yearly: false,
        }
    }
}

/// Expected column set of report/operations sheets.
pub const REPORT_COLUMNS: &[&str] = &[
    "STT",
    "Mã Lớp",
    "Nội dung",
    "Buổi",
    "Ngày",
    "Thứ",
    "Giảng Viên",
    "DĐ",
    "BRCĐ",
    "CNTT",
    "OL",
    "KN",
    "Coach",
    "AI Mentor",
    "TTKD",
    "OKR",
    "STL",
    "OS",
    "CT",
    "HOC",
    "Đơn vị",
    "SL HV",
    "Hình Thức",
    "ĐTV",
];
