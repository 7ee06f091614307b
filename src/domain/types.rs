// ==========================================
// 包裹物流后台 - 领域类型定义
// ==========================================
// 物流状态 (13 个) / 主状态 (5 个) / 界面类型 (3 个)
// 序列化格式: snake_case (与文档库存储值一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 物流状态 (Logistic Status)
// ==========================================
// 初始状态: PendingReception
// 终止状态: Delivered (无后继)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticStatus {
    PendingReception,   // 待接收
    Received,           // 已入库
    Weighed,            // 已称重
    Verified,           // 已核验
    WeightIssue,        // 重量异常
    ReadyGrouping,      // 待集货
    Grouped,            // 已集货
    Shipped,            // 已发运
    ArrivedDestination, // 已到达目的地
    ReadyPickup,        // 待取件
    Delivered,          // 已签收
    SpecialCase,        // 特殊处理
    Sorted,             // 已分拣
}

impl LogisticStatus {
    /// 全部物流状态（按业务流程顺序）
    pub const ALL: [LogisticStatus; 13] = [
        LogisticStatus::PendingReception,
        LogisticStatus::Received,
        LogisticStatus::Weighed,
        LogisticStatus::Verified,
        LogisticStatus::WeightIssue,
        LogisticStatus::ReadyGrouping,
        LogisticStatus::Grouped,
        LogisticStatus::Shipped,
        LogisticStatus::ArrivedDestination,
        LogisticStatus::ReadyPickup,
        LogisticStatus::Delivered,
        LogisticStatus::SpecialCase,
        LogisticStatus::Sorted,
    ];

    /// 从存储字符串解析（未知值返回 None）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pending_reception" => Some(LogisticStatus::PendingReception),
            "received" => Some(LogisticStatus::Received),
            "weighed" => Some(LogisticStatus::Weighed),
            "verified" => Some(LogisticStatus::Verified),
            "weight_issue" => Some(LogisticStatus::WeightIssue),
            "ready_grouping" => Some(LogisticStatus::ReadyGrouping),
            "grouped" => Some(LogisticStatus::Grouped),
            "shipped" => Some(LogisticStatus::Shipped),
            "arrived_destination" => Some(LogisticStatus::ArrivedDestination),
            "ready_pickup" => Some(LogisticStatus::ReadyPickup),
            "delivered" => Some(LogisticStatus::Delivered),
            "special_case" => Some(LogisticStatus::SpecialCase),
            "sorted" => Some(LogisticStatus::Sorted),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LogisticStatus::PendingReception => "pending_reception",
            LogisticStatus::Received => "received",
            LogisticStatus::Weighed => "weighed",
            LogisticStatus::Verified => "verified",
            LogisticStatus::WeightIssue => "weight_issue",
            LogisticStatus::ReadyGrouping => "ready_grouping",
            LogisticStatus::Grouped => "grouped",
            LogisticStatus::Shipped => "shipped",
            LogisticStatus::ArrivedDestination => "arrived_destination",
            LogisticStatus::ReadyPickup => "ready_pickup",
            LogisticStatus::Delivered => "delivered",
            LogisticStatus::SpecialCase => "special_case",
            LogisticStatus::Sorted => "sorted",
        }
    }
}

impl Default for LogisticStatus {
    fn default() -> Self {
        LogisticStatus::PendingReception
    }
}

impl fmt::Display for LogisticStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl FromStr for LogisticStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogisticStatus::parse(s).ok_or_else(|| format!("未知物流状态: {}", s))
    }
}

// ==========================================
// 主状态 (Main Status)
// ==========================================
// 面向客户的粗粒度状态,由物流状态派生,不可单独设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainStatus {
    Pending,              // 待处理
    ToWarehouse,          // 入仓中
    FromWarehouseToCongo, // 出仓发往刚果
    ArrivedInCongo,       // 已抵达刚果
    Delivered,            // 已签收
}

impl MainStatus {
    pub const ALL: [MainStatus; 5] = [
        MainStatus::Pending,
        MainStatus::ToWarehouse,
        MainStatus::FromWarehouseToCongo,
        MainStatus::ArrivedInCongo,
        MainStatus::Delivered,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pending" => Some(MainStatus::Pending),
            "to_warehouse" => Some(MainStatus::ToWarehouse),
            "from_warehouse_to_congo" => Some(MainStatus::FromWarehouseToCongo),
            "arrived_in_congo" => Some(MainStatus::ArrivedInCongo),
            "delivered" => Some(MainStatus::Delivered),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MainStatus::Pending => "pending",
            MainStatus::ToWarehouse => "to_warehouse",
            MainStatus::FromWarehouseToCongo => "from_warehouse_to_congo",
            MainStatus::ArrivedInCongo => "arrived_in_congo",
            MainStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for MainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 界面类型 (Interface Kind)
// ==========================================
// 仅用于过滤各操作界面的展示范围,不参与状态流转校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    Reception, // 收货
    Weighing,  // 称重
    Sorting,   // 分拣
}

impl InterfaceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "reception" => Some(InterfaceKind::Reception),
            "weighing" => Some(InterfaceKind::Weighing),
            "sorting" => Some(InterfaceKind::Sorting),
            _ => None,
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceKind::Reception => write!(f, "reception"),
            InterfaceKind::Weighing => write!(f, "weighing"),
            InterfaceKind::Sorting => write!(f, "sorting"),
        }
    }
}

// ==========================================
// 调整类型 (Adjustment Kind)
// ==========================================
// 称重对账结果的持久化形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    None,       // 无需调整
    Supplement, // 补缴
    Refund,     // 退款
}

impl AdjustmentKind {
    /// 未知取值返回 None，由仓储层按数据损坏处理
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "none" => Some(AdjustmentKind::None),
            "supplement" => Some(AdjustmentKind::Supplement),
            "refund" => Some(AdjustmentKind::Refund),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            AdjustmentKind::None => "none",
            AdjustmentKind::Supplement => "supplement",
            AdjustmentKind::Refund => "refund",
        }
    }
}
