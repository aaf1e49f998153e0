use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label shown for overdue tasks and projects. Never sent to the API.
pub const OVERDUE_LABEL: &str = "Em Atraso";

/// Declares a status-like enum that serializes as its API label and keeps
/// unknown labels in an `Other` variant.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Every known label, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(s) => s,
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $($label => Self::$variant,)+
                    _ => Self::Other(s),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(
    TaskStatus {
        Pendente => "Pendente",
        EmAndamento => "Em Andamento",
        Concluida => "Concluída",
        EmAtraso => "Em Atraso",
    }
);

labelled_enum!(
    ProjectStatus {
        Pendente => "Pendente",
        EmAndamento => "Em Andamento",
        Concluido => "Concluído",
        EmAtraso => "Em Atraso",
    }
);

labelled_enum!(
    CallStatus {
        Aberto => "Aberto",
        EmAndamento => "Em Andamento",
        Concluido => "Concluído",
        Cancelado => "Cancelado",
    }
);

labelled_enum!(
    /// Shared by tasks and calls.
    Priority {
        Alta => "Alta",
        Media => "Média",
        Baixa => "Baixa",
    }
);

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pendente
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Aberto
    }
}

impl Priority {
    /// Sort rank: Alta first, unknown priorities last.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Alta => 1,
            Self::Media => 2,
            Self::Baixa => 3,
            Self::Other(_) => 99,
        }
    }
}

/// A status that can be overridden with "Em Atraso" for display.
pub trait TrackedStatus: Clone {
    fn overdue() -> Self;
    fn is_terminal(&self) -> bool;
}

impl TrackedStatus for TaskStatus {
    fn overdue() -> Self {
        Self::EmAtraso
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Concluida)
    }
}

impl TrackedStatus for ProjectStatus {
    fn overdue() -> Self {
        Self::EmAtraso
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Concluido)
    }
}

/// True when the due date (taken at midnight) lies before `now` and the
/// status is not terminal.
pub fn is_overdue<S: TrackedStatus>(due: Option<NaiveDate>, status: &S, now: NaiveDateTime) -> bool {
    let Some(due) = due.and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return false;
    };
    due < now && !status.is_terminal()
}

/// Status to show for a record; the stored status is left untouched.
pub fn display_status<S: TrackedStatus>(due: Option<NaiveDate>, status: &S, now: NaiveDateTime) -> S {
    if is_overdue(due, status, now) {
        S::overdue()
    } else {
        status.clone()
    }
}
