// ==========================================
// 包裹物流后台 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供前台界面 / HTTP 服务调用
// ==========================================

pub mod error;
pub mod parcel_api;
pub mod weighing_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use parcel_api::{ParcelApi, StatusView};
pub use weighing_api::{WeighingApi, WeighingOutcome};
