//! Closed label vocabularies.
//!
//! Every labeled metric family takes its label values from one of these enums,
//! which keeps series cardinality bounded by construction.

/// A label value drawn from a fixed enumeration.
pub trait LabelValue: Copy + 'static {
    /// Label name this vocabulary is attached to (`type`, `error`).
    const NAME: &'static str;
    /// Every value, in declaration order.
    const ALL: &'static [Self];

    /// Wire representation of the value.
    fn as_str(self) -> &'static str;

    /// The `(name, value)` pair used by the metric primitives.
    fn pair(self) -> (&'static str, &'static str) {
        (Self::NAME, self.as_str())
    }
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl LabelValue for $name {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// Transport an inbound request arrived on.
    Transport, "type" {
        Udp => "udp",
        Tcp => "tcp",
    }
}

label_enum! {
    /// Kind of request forwarded to another server.
    ExternalKind, "type" {
        /// Forwarded to a recursive nameserver.
        Recursive => "recursive",
        /// Forwarded to a stub zone nameserver.
        Stub => "stub",
        /// Internal lookup (CNAME/SRV target chasing).
        Lookup => "lookup",
    }
}

label_enum! {
    /// Source of a backend parse failure.
    BackendKind, "type" {
        Other => "other",
        Etcd => "etcd",
    }
}

label_enum! {
    /// Error class a request ended in.
    ErrorClass, "error" {
        Nxdomain => "nxdomain",
        Nodata => "nodata",
        Truncated => "truncated",
        Refused => "refused",
        Overflow => "overflow",
    }
}

label_enum! {
    /// Cache a gauge or miss counter refers to.
    CacheKind, "type" {
        Response => "response",
        Signature => "signature",
    }
}
