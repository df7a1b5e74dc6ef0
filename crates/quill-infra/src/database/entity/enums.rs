//! String-backed enum columns and their domain counterparts.

use quill_core::domain;
use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PostStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CommentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "reported")]
    Reported,
    #[sea_orm(string_value = "hidden")]
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ContentType {
    #[sea_orm(string_value = "Post")]
    Post,
    #[sea_orm(string_value = "Comment")]
    Comment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ReportReason {
    #[sea_orm(string_value = "inappropriate")]
    Inappropriate,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "hate_speech")]
    HateSpeech,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

/// Both directions of the variant mapping between a column enum and the
/// domain enum of the same name.
macro_rules! mirror_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$name> for domain::$name {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => domain::$name::$variant,)+
                }
            }
        }

        impl From<domain::$name> for $name {
            fn from(value: domain::$name) -> Self {
                match value {
                    $(domain::$name::$variant => $name::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(Role { User, Admin });
mirror_enum!(PostStatus { Draft, Published });
mirror_enum!(CommentStatus { Active, Reported, Hidden });
mirror_enum!(ContentType { Post, Comment });
mirror_enum!(ReportReason { Inappropriate, Spam, HateSpeech, Other });
mirror_enum!(ReportStatus { Pending, Reviewed, Resolved });
