//! 记忆层：SQLite 键值存储（Swarm 分数、Fabric 连接、用户画像等）

pub mod kv_store;

pub use kv_store::KvStore;
