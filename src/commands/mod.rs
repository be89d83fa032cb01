pub mod categories;
pub mod create;
pub mod delete;
pub mod edit;
pub mod events;
pub mod fields;
pub mod show;
pub mod signin;
pub mod signout;
pub mod signup;
pub mod whoami;
