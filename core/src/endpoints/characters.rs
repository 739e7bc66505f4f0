//! Character resource.

use http::Method;

use crate::client::Client;
use crate::context::Context;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::CharacterPublicInfo;

/// Operations on characters.
pub struct CharactersEndpoint<'c, T> {
    client: &'c Client<T>,
}

impl<'c, T: HttpTransport> CharactersEndpoint<'c, T> {
    pub(crate) fn new(client: &'c Client<T>) -> Self {
        Self { client }
    }

    /// Public information about a character.
    pub async fn get(&self, ctx: &Context, cid: i64) -> Result<CharacterPublicInfo, Error> {
        let path = format!("v1/characters/{cid}/");
        self.client
            .call(ctx, Method::GET, &path, None::<&()>)
            .await
    }
}
