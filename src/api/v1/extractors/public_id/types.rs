/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - tag と ResourceKind の対応はここだけで決める
 */
use super::core::{IdKind, PublicId};
use crate::repos::ResourceKind;

pub enum PostTag {}
impl IdKind for PostTag {
    const KIND: ResourceKind = ResourceKind::Post;
}
pub type PublicPostId = PublicId<PostTag>;

pub enum CommentTag {}
impl IdKind for CommentTag {
    const KIND: ResourceKind = ResourceKind::Comment;
}
pub type PublicCommentId = PublicId<CommentTag>;

pub enum TaskTag {}
impl IdKind for TaskTag {
    const KIND: ResourceKind = ResourceKind::Task;
}
pub type PublicTaskId = PublicId<TaskTag>;
