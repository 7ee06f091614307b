// ==========================================
// 包裹物流后台 - 物流状态机
// ==========================================
// 职责: 状态流转合法性 / 主状态派生 / 展示文案与颜色 / 界面可见性
// 红线: 全部为静态表查询，未知输入降级为安全默认值，不报错
// ==========================================

use crate::domain::types::{InterfaceKind, LogisticStatus, MainStatus};

/// 未知状态的展示文案
pub const UNKNOWN_STATUS_LABEL: &str = "Statut inconnu";

/// 未知状态的颜色
pub const UNKNOWN_STATUS_COLOR: &str = "bg-gray-100 text-gray-800";

// ==========================================
// LogisticStatusMachine - 纯函数工具类
// ==========================================
pub struct LogisticStatusMachine;

impl LogisticStatusMachine {
    /// 合法后继状态（邻接表）
    ///
    /// Delivered 为唯一终止状态
    pub fn allowed_transitions(from: LogisticStatus) -> &'static [LogisticStatus] {
        use LogisticStatus::*;

        match from {
            PendingReception => &[Received],
            Received => &[Weighed, Verified, WeightIssue, SpecialCase],
            Weighed => &[Verified, WeightIssue],
            Verified => &[Sorted, ReadyGrouping],
            WeightIssue => &[Verified, SpecialCase],
            ReadyGrouping => &[Grouped],
            Grouped => &[Shipped],
            Shipped => &[ArrivedDestination],
            ArrivedDestination => &[ReadyPickup],
            ReadyPickup => &[Delivered],
            Delivered => &[],
            SpecialCase => &[Verified, Sorted],
            Sorted => &[ReadyGrouping],
        }
    }

    /// 状态流转是否合法
    pub fn is_transition_allowed(from: LogisticStatus, to: LogisticStatus) -> bool {
        Self::allowed_transitions(from).contains(&to)
    }

    /// 状态流转是否合法（原始字符串）
    ///
    /// 任一端无法识别 → false
    pub fn is_transition_allowed_raw(from: &str, to: &str) -> bool {
        match (LogisticStatus::parse(from), LogisticStatus::parse(to)) {
            (Some(from), Some(to)) => Self::is_transition_allowed(from, to),
            _ => false,
        }
    }

    /// 是否为终止状态
    pub fn is_terminal(status: LogisticStatus) -> bool {
        Self::allowed_transitions(status).is_empty()
    }

    /// 物流状态 → 主状态（多对一）
    pub fn main_status(status: LogisticStatus) -> MainStatus {
        use LogisticStatus::*;

        match status {
            PendingReception => MainStatus::Pending,
            Received | Weighed | Verified | WeightIssue | SpecialCase | Sorted | ReadyGrouping
            | Grouped => MainStatus::ToWarehouse,
            Shipped => MainStatus::FromWarehouseToCongo,
            ArrivedDestination | ReadyPickup => MainStatus::ArrivedInCongo,
            Delivered => MainStatus::Delivered,
        }
    }

    /// 展示文案（法语，前台界面语言）
    pub fn label(status: LogisticStatus) -> &'static str {
        use LogisticStatus::*;

        match status {
            PendingReception => "En attente de réception",
            Received => "Reçu à l'entrepôt",
            Weighed => "Pesé",
            Verified => "Vérifié",
            WeightIssue => "Problème de poids",
            ReadyGrouping => "Prêt pour groupage",
            Grouped => "Groupé",
            Shipped => "Expédié",
            ArrivedDestination => "Arrivé à destination",
            ReadyPickup => "Prêt pour retrait",
            Delivered => "Livré",
            SpecialCase => "Cas spécial",
            Sorted => "Trié",
        }
    }

    /// 展示颜色（CSS class）
    pub fn color_class(status: LogisticStatus) -> &'static str {
        use LogisticStatus::*;

        match status {
            PendingReception => "bg-yellow-100 text-yellow-800",
            Received => "bg-blue-100 text-blue-800",
            Weighed => "bg-indigo-100 text-indigo-800",
            Verified => "bg-green-100 text-green-800",
            WeightIssue => "bg-red-100 text-red-800",
            ReadyGrouping => "bg-purple-100 text-purple-800",
            Grouped => "bg-purple-200 text-purple-900",
            Shipped => "bg-cyan-100 text-cyan-800",
            ArrivedDestination => "bg-teal-100 text-teal-800",
            ReadyPickup => "bg-lime-100 text-lime-800",
            Delivered => "bg-emerald-100 text-emerald-800",
            SpecialCase => "bg-orange-100 text-orange-800",
            Sorted => "bg-sky-100 text-sky-800",
        }
    }

    pub fn label_raw(status: &str) -> &'static str {
        LogisticStatus::parse(status)
            .map(Self::label)
            .unwrap_or(UNKNOWN_STATUS_LABEL)
    }

    pub fn color_class_raw(status: &str) -> &'static str {
        LogisticStatus::parse(status)
            .map(Self::color_class)
            .unwrap_or(UNKNOWN_STATUS_COLOR)
    }

    /// 各操作界面关注的状态
    pub fn interface_statuses(kind: InterfaceKind) -> &'static [LogisticStatus] {
        use LogisticStatus::*;

        match kind {
            InterfaceKind::Reception => &[PendingReception, Received],
            InterfaceKind::Weighing => &[Received, Weighed, WeightIssue],
            InterfaceKind::Sorting => &[Weighed, Verified, SpecialCase, Sorted],
        }
    }

    /// 状态是否在指定界面展示（仅用于过滤，不参与流转校验）
    pub fn is_visible_in_interface(status: LogisticStatus, kind: InterfaceKind) -> bool {
        Self::interface_statuses(kind).contains(&status)
    }

    pub fn is_visible_in_interface_raw(status: &str, kind: &str) -> bool {
        match (LogisticStatus::parse(status), InterfaceKind::parse(kind)) {
            (Some(status), Some(kind)) => Self::is_visible_in_interface(status, kind),
            _ => false,
        }
    }
}
