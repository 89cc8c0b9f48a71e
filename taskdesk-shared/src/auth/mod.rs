/// Authentication and authorization
///
/// - `password`: Argon2id hashing and strength validation
/// - `jwt`: HS256 access/refresh tokens carrying user id and role
/// - `middleware`: request-scoped auth context
/// - `policy`: the role-based authorization engine

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
