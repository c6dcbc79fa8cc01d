//! Result ordering for list endpoints.
//!
//! Each resource accepts its own set of `ordering` query values. Descending
//! variants carry a `-` prefix on the wire.

use std::fmt;

/// An ordering criterion that can be sent as the `ordering` query parameter.
pub trait Ordering: Copy + Send + Sync + 'static {
    /// The wire value, e.g. `"-created_date"`.
    fn as_query(&self) -> &'static str;
}

macro_rules! ordering_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Parse a wire value such as `"-trust"`.
            pub fn from_query(value: &str) -> Option<Self> {
                match value {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl Ordering for $name {
            fn as_query(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_query())
            }
        }
    };
}

ordering_enum! {
    /// Ordering for account lists.
    AccountOrder, default = Created {
        /// Created date, ascending.
        Created => "created_date",
        /// Created date, descending.
        CreatedDesc => "-created_date",
        /// Modified date, ascending.
        Modified => "modified_date",
        /// Modified date, descending.
        ModifiedDesc => "-modified_date",
        /// Account ID, ascending.
        Id => "id",
        /// Account ID, descending.
        IdDesc => "-id",
        /// Account number, ascending.
        Number => "account_number",
        /// Account number, descending.
        NumberDesc => "-account_number",
        /// Trust, ascending.
        Trust => "trust",
        /// Trust, descending.
        TrustDesc => "-trust",
    }
}

ordering_enum! {
    /// Ordering for bank transaction lists.
    TransactionOrder, default = BlockCreated {
        /// Amount, ascending.
        Amount => "amount",
        /// Amount, descending.
        AmountDesc => "-amount",
        /// Block created date, ascending.
        BlockCreated => "block__created_date",
        /// Block created date, descending.
        BlockCreatedDesc => "-block__created_date",
        /// Block modified date, ascending.
        BlockModified => "block__modified_date",
        /// Block modified date, descending.
        BlockModifiedDesc => "-block__modified_date",
        /// Block ID, ascending.
        BlockId => "block__id",
        /// Block ID, descending.
        BlockIdDesc => "-block__id",
        /// Block sender, ascending.
        BlockSender => "block__sender",
        /// Block sender, descending.
        BlockSenderDesc => "-block__sender",
        /// Transaction ID, ascending.
        Id => "id",
        /// Transaction ID, descending.
        IdDesc => "-id",
        /// Recipient, ascending.
        Recipient => "recipient",
        /// Recipient, descending.
        RecipientDesc => "-recipient",
    }
}

ordering_enum! {
    /// Ordering for bank lists.
    BankOrder, default = TrustDesc {
        /// ID, ascending.
        Id => "id",
        /// ID, descending.
        IdDesc => "-id",
        /// Account number, ascending.
        AccountNumber => "account_number",
        /// Account number, descending.
        AccountNumberDesc => "-account_number",
        /// IP address, ascending.
        IpAddress => "ip_address",
        /// IP address, descending.
        IpAddressDesc => "-ip_address",
        /// Node identifier, ascending.
        NodeIdentifier => "node_identifier",
        /// Node identifier, descending.
        NodeIdentifierDesc => "-node_identifier",
        /// Port, ascending.
        Port => "port",
        /// Port, descending.
        PortDesc => "-port",
        /// URL protocol, ascending.
        Protocol => "protocol",
        /// URL protocol, descending.
        ProtocolDesc => "-protocol",
        /// Version, ascending.
        Version => "version",
        /// Version, descending.
        VersionDesc => "-version",
        /// Default transaction fee, ascending.
        DefaultTransactionFee => "default_transaction_fee",
        /// Default transaction fee, descending.
        DefaultTransactionFeeDesc => "-default_transaction_fee",
        /// Trust, ascending.
        Trust => "trust",
        /// Trust, descending.
        TrustDesc => "-trust",
    }
}

ordering_enum! {
    /// Ordering for block lists.
    BlockOrder, default = Created {
        /// Created date, ascending.
        Created => "created_date",
        /// Created date, descending.
        CreatedDesc => "-created_date",
        /// Modified date, ascending.
        Modified => "modified_date",
        /// Modified date, descending.
        ModifiedDesc => "-modified_date",
        /// ID, ascending.
        Id => "id",
        /// ID, descending.
        IdDesc => "-id",
        /// Balance key, ascending.
        BalanceKey => "balance_key",
        /// Balance key, descending.
        BalanceKeyDesc => "-balance_key",
        /// Sender, ascending.
        Sender => "sender",
        /// Sender, descending.
        SenderDesc => "-sender",
        /// Signature, ascending.
        Signature => "signature",
        /// Signature, descending.
        SignatureDesc => "-signature",
    }
}

ordering_enum! {
    /// Ordering for validator lists.
    ValidatorOrder, default = TrustDesc {
        /// ID, ascending.
        Id => "id",
        /// ID, descending.
        IdDesc => "-id",
        /// Account number, ascending.
        AccountNumber => "account_number",
        /// Account number, descending.
        AccountNumberDesc => "-account_number",
        /// IP address, ascending.
        IpAddress => "ip_address",
        /// IP address, descending.
        IpAddressDesc => "-ip_address",
        /// Node identifier, ascending.
        NodeIdentifier => "node_identifier",
        /// Node identifier, descending.
        NodeIdentifierDesc => "-node_identifier",
        /// Port, ascending.
        Port => "port",
        /// Port, descending.
        PortDesc => "-port",
        /// URL protocol, ascending.
        Protocol => "protocol",
        /// URL protocol, descending.
        ProtocolDesc => "-protocol",
        /// Version, ascending.
        Version => "version",
        /// Version, descending.
        VersionDesc => "-version",
        /// Default transaction fee, ascending.
        DefaultTransactionFee => "default_transaction_fee",
        /// Default transaction fee, descending.
        DefaultTransactionFeeDesc => "-default_transaction_fee",
        /// Root account file, ascending.
        RootAccountFile => "root_account_file",
        /// Root account file, descending.
        RootAccountFileDesc => "-root_account_file",
        /// Daily confirmation rate, ascending.
        DailyConfirmationRate => "daily_confirmation_rate",
        /// Daily confirmation rate, descending.
        DailyConfirmationRateDesc => "-daily_confirmation_rate",
        /// Trust, ascending.
        Trust => "trust",
        /// Trust, descending.
        TrustDesc => "-trust",
    }
}

ordering_enum! {
    /// Ordering for confirmation block lists.
    ConfirmationBlockOrder, default = Created {
        /// Created date, ascending.
        Created => "created_date",
        /// Created date, descending.
        CreatedDesc => "-created_date",
        /// Modified date, ascending.
        Modified => "modified_date",
        /// Modified date, descending.
        ModifiedDesc => "-modified_date",
        /// ID, ascending.
        Id => "id",
        /// ID, descending.
        IdDesc => "-id",
        /// Original block ID, ascending.
        Block => "block",
        /// Original block ID, descending.
        BlockDesc => "-block",
        /// Validator, ascending.
        Validator => "validator",
        /// Validator, descending.
        ValidatorDesc => "-validator",
        /// Block identifier, ascending.
        BlockIdentifier => "block_identifier",
        /// Block identifier, descending.
        BlockIdentifierDesc => "-block_identifier",
    }
}

ordering_enum! {
    /// Ordering for invalid block lists.
    InvalidBlockOrder, default = Created {
        /// Created date, ascending.
        Created => "created_date",
        /// Created date, descending.
        CreatedDesc => "-created_date",
        /// Modified date, ascending.
        Modified => "modified_date",
        /// Modified date, descending.
        ModifiedDesc => "-modified_date",
        /// ID, ascending.
        Id => "id",
        /// ID, descending.
        IdDesc => "-id",
        /// Original block ID, ascending.
        Block => "block",
        /// Original block ID, descending.
        BlockDesc => "-block",
        /// Confirmation validator, ascending.
        ConfirmationValidator => "confirmation_validator",
        /// Confirmation validator, descending.
        ConfirmationValidatorDesc => "-confirmation_validator",
        /// Primary validator, ascending.
        PrimaryValidator => "primary_validator",
        /// Primary validator, descending.
        PrimaryValidatorDesc => "-primary_validator",
        /// Block identifier, ascending.
        BlockIdentifier => "block_identifier",
        /// Block identifier, descending.
        BlockIdentifierDesc => "-block_identifier",
    }
}
