//! Data models for Lendhub

/// Store a string-valued enum in a Postgres TEXT column through its
/// `as_str` / `FromStr` pair.
macro_rules! impl_text_enum {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

pub mod inquiry;
pub mod item;
pub mod pagination;
pub mod user;

// Re-export commonly used types
pub use inquiry::{Inquiry, InquiryDetails, InquiryStats, InquiryStatus};
pub use item::{Item, ItemSummary};
pub use pagination::{PageMeta, PageQuery, PageRequest};
pub use user::{ApprovalStatus, Role, User, UserClaims, UserSummary};
