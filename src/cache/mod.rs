pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// Registers an object cache backend under a name at program start.
///
/// The plugin type must expose `fn new() -> Result<Self, String>`.
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $plugin:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $plugin:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    ::std::sync::Arc::new(|| {
                        let fut: $crate::cache::register::BoxedObjectCacheFuture =
                            ::std::boxed::Box::pin(async {
                                let cache = $plugin::new()
                                    .map_err($crate::errors::EssaySystemError::cache_connection)?;
                                let boxed: ::std::boxed::Box<dyn $crate::cache::ObjectCache> =
                                    ::std::boxed::Box::new(cache);
                                Ok(boxed)
                            });
                        fut
                    }),
                );
            }
        }
    };
}
