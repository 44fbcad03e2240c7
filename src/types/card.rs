// Copyright 2025 Fernando Borretti
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

use crate::types::card_id::CardId;
use crate::types::card_id::Hasher;

#[derive(Clone)]
pub struct Card {
    /// The name of the deck this card belongs to.
    deck_name: String,
    /// The question side.
    front: String,
    /// The answer side.
    back: String,
    /// The cached hash of the card's content.
    id: CardId,
}

impl Card {
    pub fn new(deck_name: String, front: String, back: String) -> Self {
        let id = {
            let mut hasher = Hasher::new();
            hasher.update(b"Q:");
            hasher.update(front.as_bytes());
            hasher.update(b"A:");
            hasher.update(back.as_bytes());
            hasher.finalize()
        };
        Self {
            deck_name,
            front,
            back,
            id,
        }
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn id(&self) -> CardId {
        self.id
    }
}
