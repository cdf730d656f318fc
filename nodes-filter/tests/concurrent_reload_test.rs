// Copyright 2023 The Nodes Filter Authors
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

//! Readers observe either the old or the new filter while another thread swaps them

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use nodes_filter::FilterCache;
use nodes_filter::FilterSlot;
use nodes_filter::ParseOptions;
use nodes_filter::ResourceMetadata;

const FOLDERS: &str = "Folder()";
const CONTENT: &str = "Path(+'^/content(/.*)?$')";

#[test]
fn test_readers_never_observe_a_mixed_filter() {
    let slot = Arc::new(FilterSlot::activate("test.filter", FOLDERS, &ParseOptions::default()).unwrap());
    let stop = Arc::new(AtomicBool::new(false));
    let folder = ResourceMetadata::new("/apps/x").with_folder(true);
    let page = ResourceMetadata::new("/content/x");

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let slot = Arc::clone(&slot);
            let stop = Arc::clone(&stop);
            let folder = folder.clone();
            let page = page.clone();
            thread::spawn(move || {
                let mut checked = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    let filter = slot.load();
                    let expected = filter.source() == FOLDERS;
                    assert_eq!(filter.matches(&folder), expected);
                    assert_eq!(filter.matches(&page), !expected);
                    checked += 1;
                }
                checked
            })
        })
        .collect();

    for round in 0..200 {
        let source = if round % 2 == 0 { CONTENT } else { FOLDERS };
        slot.reload(source).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(slot.generation(), 200);
    assert_eq!(slot.load().source(), FOLDERS);
}

#[test]
fn test_cache_compiles_each_source_once_across_threads() {
    let cache = Arc::new(FilterCache::new());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get(CONTENT).unwrap())
        })
        .collect();
    let compiled: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(cache.len(), 1);
    assert!(compiled.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
