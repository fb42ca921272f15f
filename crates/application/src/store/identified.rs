use quay_domain::{
    AuditLog, Container, Equipment, GateOperation, ShippingLine, User, Vehicle, YardBlock,
};

/// Entities with a server-assigned id, so cached lists can be patched in
/// place after a mutation.
pub trait Identified {
    /// The entity id.
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

identified!(
    AuditLog,
    Container,
    Equipment,
    GateOperation,
    ShippingLine,
    User,
    Vehicle,
    YardBlock,
);
