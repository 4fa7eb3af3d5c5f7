//! Closed value sets shared by the GraphQL schema and the database.
//!
//! Every enum is declared once through [`domain_enum!`], which derives the
//! GraphQL enum, its wire string and the conversions to the Postgres type in
//! `infra::models`. [`DOMAIN_ENUMS`] is the static list the schema registers.

use async_graphql::{ObjectType, SchemaBuilder, SubscriptionType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {enum_name} value: {value}")]
pub struct UnknownVariant {
    pub enum_name: &'static str,
    pub value: String,
}

macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $db:ident { $( $variant:ident = $wire:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(async_graphql::Enum, Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const NAME: &'static str = stringify!($name);
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];
            pub const VALUES: &'static [&'static str] = &[$( $wire ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err(UnknownVariant {
                        enum_name: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl From<infra::models::$db> for $name {
            fn from(value: infra::models::$db) -> Self {
                match value {
                    $( infra::models::$db::$variant => $name::$variant ),+
                }
            }
        }

        impl From<$name> for infra::models::$db {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => infra::models::$db::$variant ),+
                }
            }
        }
    };
}

domain_enum! {
    ContentType => ContentType { Lol = "LOL", Futsal = "FUTSAL" }
}

domain_enum! {
    SessionStatus => SessionStatus {
        Scheduled = "SCHEDULED",
        Confirmed = "CONFIRMED",
        Done = "DONE",
    }
}

domain_enum! {
    AttendanceStatus => AttendanceStatus {
        Attending = "ATTENDING",
        Undecided = "UNDECIDED",
        NotAttending = "NOT_ATTENDING",
    }
}

domain_enum! {
    /// The group a friend plays for. Stable across matches, unlike [`Side`].
    Team => Team { A = "A", B = "B" }
}

domain_enum! {
    Lane => Lane {
        Top = "TOP",
        Jg = "JG",
        Mid = "MID",
        Adc = "ADC",
        Sup = "SUP",
        Unknown = "UNKNOWN",
    }
}

domain_enum! {
    /// Map side a team played on in one match.
    Side => Side { Blue = "BLUE", Red = "RED", Unknown = "UNKNOWN" }
}

domain_enum! {
    MatchStatus => MatchStatus { Draft = "DRAFT", Completed = "COMPLETED" }
}

domain_enum! {
    AttachmentScope => AttachmentScope { Session = "SESSION", Match = "MATCH" }
}

domain_enum! {
    AttachmentType => AttachmentType { LolResultScreen = "LOL_RESULT_SCREEN" }
}

domain_enum! {
    ExtractionStatus => ExtractionStatus {
        Pending = "PENDING",
        Done = "DONE",
        Failed = "FAILED",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnumDefinition {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

macro_rules! domain_enum_table {
    ($( $name:ident ),+ $(,)?) => {
        pub static DOMAIN_ENUMS: &[EnumDefinition] = &[
            $( EnumDefinition { name: $name::NAME, values: $name::VALUES } ),+
        ];

        /// Registers every domain enum with the schema, including those no
        /// field references yet.
        pub fn register_domain_enums<Q, M, S>(
            builder: SchemaBuilder<Q, M, S>,
        ) -> SchemaBuilder<Q, M, S>
        where
            Q: ObjectType + 'static,
            M: ObjectType + 'static,
            S: SubscriptionType + 'static,
        {
            builder $( .register_output_type::<$name>() )+
        }
    };
}

domain_enum_table!(
    ContentType,
    SessionStatus,
    AttendanceStatus,
    Team,
    Lane,
    Side,
    MatchStatus,
    AttachmentScope,
    AttachmentType,
    ExtractionStatus,
);
