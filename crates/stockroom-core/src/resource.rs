//! Static descriptors for the API's resources.

/// Describes how a resource is addressed by the request pipeline.
///
/// Descriptors are process-wide constants, one per resource module.
///
/// ```
/// use stockroom_core::Resource;
///
/// const SUPPLIER: Resource = Resource::new("Supplier", "supplier", "supplier_id", "supplierId");
///
/// assert_eq!(SUPPLIER.name(), "Supplier");
/// assert_eq!(SUPPLIER.param(), "supplierId");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource {
    name: &'static str,
    key: &'static str,
    id_field: &'static str,
    param: &'static str,
}

impl Resource {
    /// Creates a descriptor.
    ///
    /// * `name` - Display name used in messages (`"Supplier"`)
    /// * `key` - Key under which a resolved record is stored in shared state
    /// * `id_field` - Identifier field inside a record (`"supplier_id"`)
    /// * `param` - Route parameter carrying the identifier (`"supplierId"`)
    #[must_use]
    pub const fn new(
        name: &'static str,
        key: &'static str,
        id_field: &'static str,
        param: &'static str,
    ) -> Self {
        Self {
            name,
            key,
            id_field,
            param,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the shared-state key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the identifier field name.
    #[must_use]
    pub const fn id_field(&self) -> &'static str {
        self.id_field
    }

    /// Returns the route parameter name.
    #[must_use]
    pub const fn param(&self) -> &'static str {
        self.param
    }
}
