use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use beanscope_config::ReflectionConfig;
use beanscope_types::{ClassId, TypeEnv};
use parking_lot::RwLock;

use crate::{AccessPolicy, ClassMetadata, MemberIndex, Result};

/// Hands out per-class metadata, optionally memoized.
pub trait MetadataFactory: Send + Sync {
    fn is_caching_enabled(&self) -> bool;

    fn set_caching_enabled(&self, enabled: bool);

    fn metadata_for(&self, class: ClassId) -> Result<Arc<ClassMetadata>>;

    /// The schema metadata is discovered from.
    fn type_env(&self) -> &dyn TypeEnv;
}

/// Process-scoped metadata cache.
///
/// With caching enabled a miss runs discovery outside the lock and installs the result; two
/// threads missing on the same class may both discover it, and the later insert wins. Both
/// values are equivalent since discovery only depends on the registered schema. With caching
/// disabled every call rebuilds the metadata and the map is left untouched.
///
/// Method collections are memoized separately in a [`MemberIndex`], which is only consulted
/// while caching is enabled.
pub struct DefaultMetadataFactory {
    env: Arc<dyn TypeEnv + Send + Sync>,
    policy: AccessPolicy,
    caching_enabled: AtomicBool,
    cache: RwLock<HashMap<ClassId, Arc<ClassMetadata>>>,
    members: MemberIndex,
}

impl DefaultMetadataFactory {
    pub fn new(env: Arc<dyn TypeEnv + Send + Sync>) -> Self {
        Self::with_policy(env, AccessPolicy::default())
    }

    pub fn with_policy(env: Arc<dyn TypeEnv + Send + Sync>, policy: AccessPolicy) -> Self {
        Self {
            env,
            policy,
            caching_enabled: AtomicBool::new(true),
            cache: RwLock::new(HashMap::new()),
            members: MemberIndex::new(),
        }
    }

    pub fn from_config(env: Arc<dyn TypeEnv + Send + Sync>, config: &ReflectionConfig) -> Self {
        let factory = Self::with_policy(env, AccessPolicy::from(config));
        factory.set_caching_enabled(config.cache_enabled);
        factory
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    pub fn member_index(&self) -> &MemberIndex {
        &self.members
    }

    /// Drops every cached entry and memoized method collection. Outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.cache.write().clear();
        self.members.clear();
    }

    fn discover(&self, class: ClassId) -> Result<Arc<ClassMetadata>> {
        ClassMetadata::discover(&*self.env, class, self.policy).map(Arc::new)
    }

    fn discover_memoized(&self, class: ClassId) -> Result<Arc<ClassMetadata>> {
        ClassMetadata::discover_with(&*self.env, class, self.policy, &self.members).map(Arc::new)
    }
}

impl MetadataFactory for DefaultMetadataFactory {
    fn is_caching_enabled(&self) -> bool {
        self.caching_enabled.load(Ordering::Acquire)
    }

    fn set_caching_enabled(&self, enabled: bool) {
        self.caching_enabled.store(enabled, Ordering::Release);
    }

    fn metadata_for(&self, class: ClassId) -> Result<Arc<ClassMetadata>> {
        if !self.is_caching_enabled() {
            return self.discover(class);
        }

        if let Some(hit) = self.cache.read().get(&class) {
            tracing::trace!(class = class.to_raw(), "metadata cache hit");
            return Ok(Arc::clone(hit));
        }

        tracing::trace!(class = class.to_raw(), "metadata cache miss");
        let metadata = self.discover_memoized(class)?;
        self.cache.write().insert(class, Arc::clone(&metadata));
        Ok(metadata)
    }

    fn type_env(&self) -> &dyn TypeEnv {
        &*self.env
    }
}

impl fmt::Debug for DefaultMetadataFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMetadataFactory")
            .field("policy", &self.policy)
            .field("caching_enabled", &self.is_caching_enabled())
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
