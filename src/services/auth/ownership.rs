/*
 * Responsibility
 * - 更新・削除の直前に「この主体がこのリソースを変更してよいか」を判定する
 * - posts / comments / tasks すべてがこの関数だけを使う
 * - 存在チェック (404) は handler 側。ここに来る時点でリソースは見つかっている
 */
use crate::error::AppError;
use crate::services::auth::identity::{IdentityClaim, SubjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Forbidden),
        }
    }
}

/// Decide whether `claim` may mutate a resource owned by `owner_id`.
///
/// Allows iff the resource has a recorded owner and the claim's subject is
/// that owner or carries the admin role. A missing claim or a missing owner
/// denies everyone, admins included.
pub fn authorize(claim: Option<&IdentityClaim>, owner_id: Option<&SubjectId>) -> Decision {
    let (Some(claim), Some(owner_id)) = (claim, owner_id) else {
        return Decision::Deny;
    };

    if claim.is_subject(owner_id) || claim.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
