//! 通用工具函数

use crate::error::{QueueError, Result};
use crate::models::ROOM_COUNT;

/// 校验诊室编号是否在 1-8 范围内
pub fn validate_room(room: i32) -> Result<()> {
    if (1..=ROOM_COUNT).contains(&room) {
        Ok(())
    } else {
        Err(QueueError::Validation(format!(
            "诊室编号必须在1-{}之间: {}",
            ROOM_COUNT, room
        )))
    }
}

/// 取证件号末3个字符，不足3个字符时返回完整字符串
///
/// 按字符而非字节截取，证件号含非ASCII字符时不会截断在字符中间。
pub fn id_last_three(id_number: &str) -> String {
    let count = id_number.chars().count();
    if count <= 3 {
        id_number.to_string()
    } else {
        id_number.chars().skip(count - 3).collect()
    }
}
