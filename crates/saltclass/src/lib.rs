//! # saltclass - class based pillar and top resolution
//!
//! Resolves, for one node, the merged configuration data ("pillar") and the list of states to
//! apply ("tops") by walking a hierarchy of reusable classes.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `saltclass` works internally.
//!
//! ### Storage
//!
//! ```text
//! <root>/
//!   classes/
//!     default.yml             class `default`
//!     services/nginx.yml      class `services.nginx`
//!     services/redis/init.yml class `services.redis`
//!     roles.web.yml           class `roles.web`
//!   nodes/
//!     dc1/web01.yml           node `web01`
//! ```
//!
//! Each file is a template ([render]) that renders to a yaml mapping with these reserved keys:
//!
//! ```yaml
//! classes:            # classes to include, globs like `services.*` allowed
//!   - default
//!   - services.*
//! environment: prod   # the last document naming an environment wins
//! states:             # concatenated, duplicates dropped
//!   - nginx
//! pillars:            # merged, see below
//!   nginx:
//!     port: 80
//! ```
//!
//! ### Path resolution
//!
//! see [paths::ClassPaths] and [storage::Storage]
//!
//! A class name maps to three candidate files. The first one that exists is used. A class name
//! without a file is skipped with a warning.
//!
//! ### Expansion
//!
//! see [expand::Expansion]
//!
//! The node document names the first classes. Each class may include further classes. The graph
//! is walked depth first and every class is loaded once.
//!
//! Two orders are produced:
//!
//! | order                 | used for                                    | example         |
//! |-----------------------|---------------------------------------------|-----------------|
//! | preorder (render)     | pillar data visible to templates            | `node A B C`    |
//! | postorder (output)    | final merge, states, classes, environment  | `C B A node`    |
//!
//! _Example: the node includes `A`, `A` includes `B`, `B` includes `C`._
//!
//! ### Merging
//!
//! see [merge::merge]
//!
//! Pillars are merged in output order, so the node overrides every class and a class overrides
//! the classes it includes. Lists are appended unless the later list starts with `^`.
//!
//! ### Variables
//!
//! see [interpolate]
//!
//! After merging, `${a:b}` references inside string values are resolved against the merged tree.
//!
//! ### Output
//!
//! see [compose::Composition]
//!
//! ```yaml
//! __saltclass__:
//!   states: [nginx]
//!   classes: [default, services.nginx]
//!   environment: prod
//!   nodename: web01
//! nginx:
//!   port: 80
//! ```
//!
pub mod compose;
pub mod config;
pub mod document;
pub mod error;
pub mod expand;
pub mod interpolate;
pub mod merge;
pub mod paths;
pub mod render;
pub mod resolver;
pub mod storage;
pub mod value;
mod visit;
pub mod wildcard;

pub use config::Settings;
pub use error::{Error, Result};
pub use resolver::Resolver;
pub use value::{Map, Value};
