// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Object pools.
//!
//! A pool owns a free-list of ready instances. `acquire` hands an instance
//! out as an owned [`Pooled`] value tagged with a pool-unique [`EntryId`];
//! `release` takes it back. While handed out, the pool tracks only the id,
//! so an entry is always in exactly one place: the free-list or the caller.

mod registry;
mod resource_pool;
mod stats;

pub use self::registry::{ErasedPool, PoolRegistry};
pub use self::resource_pool::{EntryId, Poolable, Pooled, ResourcePool};
pub use self::stats::PoolStats;
