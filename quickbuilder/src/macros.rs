/// Declare a builder contract and get a typed builder for it.
///
/// Each method line declares one contract method:
///
/// - `fn with_p(p: T);` a with-method for property `p`, accepting a `T` or
///   any builder of `T`
/// - `fn with_p(p: impl Builder<T>);` a with-method accepting only builders
/// - `fn _p() -> T;` an accessor, failing with [`BuildError::NoValue`](crate::BuildError::NoValue) when unset
/// - `fn __p() -> Option<T>;` an optional accessor, `None` when unset
///
/// A single-underscore accessor declared `-> Option<T>` reads a property of
/// type `Option<T>`.
///
/// Use `MutableBuilder<Target>` instead of `Builder<Target>` for a builder
/// whose with-methods update it in place.
///
/// A contract extends others by naming them after the target,
/// `Builder<Target> + Parent`. The parents' methods are declared through
/// [`ContractDecl::extends`](crate::ContractDecl::extends) and generated on
/// the child, returning the child type. Parents must be declared with
/// `contract!` earlier in the same module. An inherited method must not be
/// declared again on the child.
///
/// ```
/// use quickbuilder::{Target, TargetShape};
///
/// #[derive(Default)]
/// struct Fruit {
///     name: String,
/// }
///
/// impl Target for Fruit {
///     fn shape() -> TargetShape<Self> {
///         TargetShape::new("Fruit")
///             .with_default()
///             .mutator("name", |f: &mut Fruit, name: String| f.name = name)
///     }
/// }
///
/// quickbuilder::contract! {
///     struct FruitBuilder: Builder<Fruit> {
///         fn with_name(name: String);
///         fn _name() -> String;
///         fn __name() -> Option<String>;
///     }
/// }
///
/// let fruit = quickbuilder::builder::<FruitBuilder>().unwrap();
/// assert_eq!(fruit.__name().unwrap(), None);
///
/// let apple = fruit.with_name("apple".to_string());
/// assert_eq!(apple._name().unwrap(), "apple");
/// assert_eq!(apple.build().unwrap().name, "apple");
///
/// quickbuilder::contract! {
///     struct RipeFruitBuilder: MutableBuilder<Fruit> + FruitBuilder {}
/// }
///
/// let ripe = quickbuilder::builder::<RipeFruitBuilder>().unwrap();
/// ripe.with_name("pear".to_string());
/// assert_eq!(ripe._name().unwrap(), "pear");
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : Builder<$target:ty> $(+ $parent:ident)* { $($body:tt)* }
    ) => {
        $crate::contract!(@munch
            { [$(#[$meta])*] [$vis] $name [$target] Immutable [$($parent)*] }
            [] [] []
            $($body)*
        );
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : MutableBuilder<$target:ty> $(+ $parent:ident)* { $($body:tt)* }
    ) => {
        $crate::contract!(@munch
            { [$(#[$meta])*] [$vis] $name [$target] Mutable [$($parent)*] }
            [] [] []
            $($body)*
        );
    };

    // with-method taking builders only
    (@munch $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
        $(#[$attr:meta])*
        fn $method:ident ($param:ident : impl Builder<$ty:ty>);
        $($rest:tt)*
    ) => {
        $crate::contract!(@munch $head
            [$($decl)* .method($crate::MethodDecl::with_builder::<$ty>(stringify!($method)))]
            [$($methods)*
                $(#[$attr])*
                pub fn $method(&self, $param: impl $crate::Builder<$ty> + 'static) -> Self {
                    Self(self.0.with::<$ty, $crate::ByBuilder, _>(stringify!($method), $param))
                }
            ]
            [$($lines)* $(#[$attr])* fn $method($param: impl Builder<$ty>);]
            $($rest)*
        );
    };

    // with-method taking a value or a builder
    (@munch $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
        $(#[$attr:meta])*
        fn $method:ident ($param:ident : $ty:ty);
        $($rest:tt)*
    ) => {
        $crate::contract!(@munch $head
            [$($decl)* .method($crate::MethodDecl::with::<$ty>(stringify!($method)))]
            [$($methods)*
                $(#[$attr])*
                pub fn $method<M>(&self, $param: impl $crate::Assign<$ty, M>) -> Self {
                    Self(self.0.with::<$ty, M, _>(stringify!($method), $param))
                }
            ]
            [$($lines)* $(#[$attr])* fn $method($param: $ty);]
            $($rest)*
        );
    };

    // optional accessor, or accessor of an optional property
    (@munch $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
        $(#[$attr:meta])*
        fn $method:ident () -> Option<$ty:ty>;
        $($rest:tt)*
    ) => {
        $crate::contract!(@munch $head
            [$($decl)* .method($crate::MethodDecl::option::<$ty>(stringify!($method)))]
            [$($methods)*
                $(#[$attr])*
                pub fn $method(&self) -> ::core::result::Result<::core::option::Option<$ty>, $crate::BuildError> {
                    self.0.get_option::<$ty>(stringify!($method))
                }
            ]
            [$($lines)* $(#[$attr])* fn $method() -> Option<$ty>;]
            $($rest)*
        );
    };

    // accessor
    (@munch $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
        $(#[$attr:meta])*
        fn $method:ident () -> $ty:ty;
        $($rest:tt)*
    ) => {
        $crate::contract!(@munch $head
            [$($decl)* .method($crate::MethodDecl::accessor::<$ty>(stringify!($method)))]
            [$($methods)*
                $(#[$attr])*
                pub fn $method(&self) -> ::core::result::Result<$ty, $crate::BuildError> {
                    self.0.get::<$ty>(stringify!($method))
                }
            ]
            [$($lines)* $(#[$attr])* fn $method() -> $ty;]
            $($rest)*
        );
    };

    // end of a parent's lines: keep its wrappers, drop its declarations
    (@munch
        { @inherited $head:tt [$($decl:tt)*] [$($lines:tt)*] [$($pending:ident)*] }
        [$($_parent_decl:tt)*] [$($methods:tt)*] [$($_parent_lines:tt)*]
    ) => {
        $crate::contract!(@parents $head [$($decl)*] [$($methods)*] [$($lines)*] [$($pending)*]);
    };

    // end of the contract's own lines
    (@munch
        { [$($meta:tt)*] [$($vis:tt)*] $name:ident [$($target:tt)*] $mode:ident [$($parent:ident)*] }
        [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
    ) => {
        $crate::contract!(@parents
            { [$($meta)*] [$($vis)*] $name [$($target)*] $mode [$($parent)*] }
            [$($decl)*] [$($methods)*] [$($lines)*] [$($parent)*]
        );
    };

    // ask the next parent for its lines
    (@parents $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
        [$parent:ident $($pending:ident)*]
    ) => {
        $parent! { @inherited $head [$($decl)*] [$($methods)*] [$($lines)*] [$($pending)*] }
    };

    (@parents $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*] []) => {
        $crate::contract!(@emit ($) $head [$($decl)*] [$($methods)*] [$($lines)*]);
    };

    // a parent's lines, munched for their wrappers alone
    (@lines [$($grandparent:ident)*] [$($parent_lines:tt)*]
        @inherited $head:tt [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*] [$($pending:ident)*]
    ) => {
        $crate::contract!(@munch
            { @inherited $head [$($decl)*] [$($lines)*] [$($pending)* $($grandparent)*] }
            [] [$($methods)*] []
            $($parent_lines)*
        );
    };

    (@emit ($d:tt)
        { [$(#[$meta:meta])*] [$vis:vis] $name:ident [$target:ty] $mode:ident [$($parent:ident)*] }
        [$($decl:tt)*] [$($methods:tt)*] [$($lines:tt)*]
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $name($crate::BuilderInstance<$target>);

        #[allow(unused_macros)]
        macro_rules! $name {
            ($d($d continuation:tt)*) => {
                $crate::contract!(@lines [$($parent)*] [$($lines)*] $d($d continuation)*);
            };
        }

        impl $crate::Contract for $name {
            type Target = $target;

            fn declare() -> $crate::ContractDecl {
                $crate::ContractDecl::interface(stringify!($name))
                    .mode($crate::Mode::$mode)
                    $($decl)*
                    $(.extends(<$parent as $crate::Contract>::declare()))*
            }

            fn from_instance(instance: $crate::BuilderInstance<$target>) -> Self {
                Self(instance)
            }

            fn instance(&self) -> &$crate::BuilderInstance<$target> {
                &self.0
            }
        }

        #[allow(dead_code)]
        impl $name {
            $($methods)*

            /// Build the target value.
            pub fn build(&self) -> ::core::result::Result<$target, $crate::BuildError> {
                self.0.build()
            }

            /// Whether every set property can advance.
            pub fn has_next(&self) -> bool {
                self.0.has_next()
            }

            /// The next builder of the sequence, if every set property can advance.
            pub fn next(&self) -> ::core::option::Option<Self> {
                self.0.next_instance().map(Self)
            }

            /// An independent copy of this builder.
            pub fn but(&self) -> Self {
                Self(self.0.but())
            }
        }

        impl $crate::Builder<$target> for $name {
            fn build(&self) -> ::core::result::Result<$target, $crate::BuildError> {
                self.0.build()
            }

            fn next(&self) -> ::core::option::Option<$crate::__private::Arc<dyn $crate::Builder<$target>>> {
                let next = self.0.next_instance()?;
                ::core::option::Option::Some($crate::__private::Arc::new(Self(next)))
            }

            fn has_next(&self) -> bool {
                self.0.has_next()
            }
        }

        impl $crate::SequenceBuilder<$target> for $name {}
    };
}
