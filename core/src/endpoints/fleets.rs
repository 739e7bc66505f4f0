//! Fleet resource.

use http::Method;

use crate::client::Client;
use crate::context::Context;
use crate::error::Error;
use crate::options::{add_options, I18nOptions};
use crate::response::Response;
use crate::transport::HttpTransport;
use crate::types::{
    CharacterFleet, CreatedSquad, CreatedWing, Fleet, FleetInvitation, FleetMember,
    FleetMemberMovement, FleetSettings, FleetWing, Naming,
};

/// Operations on fleets, their members, wings and squads.
pub struct FleetsEndpoint<'c, T> {
    client: &'c Client<T>,
}

impl<'c, T: HttpTransport> FleetsEndpoint<'c, T> {
    pub(crate) fn new(client: &'c Client<T>) -> Self {
        Self { client }
    }

    /// The fleet the character is in, if any.
    pub async fn get_character_fleet(
        &self,
        ctx: &Context,
        cid: i64,
    ) -> Result<CharacterFleet, Error> {
        let path = format!("v1/characters/{cid}/fleet/");
        self.client
            .call(ctx, Method::GET, &path, None::<&()>)
            .await
    }

    pub async fn get(&self, ctx: &Context, fid: i64) -> Result<Fleet, Error> {
        let path = format!("v1/fleets/{fid}/");
        self.client
            .call(ctx, Method::GET, &path, None::<&()>)
            .await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        fid: i64,
        settings: &FleetSettings,
    ) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/");
        self.client
            .exec(ctx, Method::PUT, &path, Some(settings))
            .await
    }

    pub async fn get_members(
        &self,
        ctx: &Context,
        fid: i64,
        opts: Option<&I18nOptions>,
    ) -> Result<Vec<FleetMember>, Error> {
        let path = add_options(&format!("v1/fleets/{fid}/members/"), opts)?;
        self.client
            .call(ctx, Method::GET, &path, None::<&()>)
            .await
    }

    pub async fn invite(
        &self,
        ctx: &Context,
        fid: i64,
        invitation: &FleetInvitation,
    ) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/members/");
        self.client
            .exec(ctx, Method::POST, &path, Some(invitation))
            .await
    }

    pub async fn kick(&self, ctx: &Context, fid: i64, cid: i64) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/members/{cid}/");
        self.client
            .exec(ctx, Method::DELETE, &path, None::<&()>)
            .await
    }

    /// Move a member between squads and wings.
    pub async fn move_member(
        &self,
        ctx: &Context,
        fid: i64,
        cid: i64,
        movement: &FleetMemberMovement,
    ) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/members/{cid}/");
        self.client
            .exec(ctx, Method::PUT, &path, Some(movement))
            .await
    }

    /// Delete a squad. Only empty squads can be deleted.
    pub async fn delete_squad(&self, ctx: &Context, fid: i64, sid: i64) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/squads/{sid}/");
        self.client
            .exec(ctx, Method::DELETE, &path, None::<&()>)
            .await
    }

    pub async fn rename_squad(
        &self,
        ctx: &Context,
        fid: i64,
        sid: i64,
        name: &str,
    ) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/squads/{sid}/");
        let body = Naming {
            name: name.to_string(),
        };
        self.client
            .exec(ctx, Method::PUT, &path, Some(&body))
            .await
    }

    pub async fn get_wings(
        &self,
        ctx: &Context,
        fid: i64,
        opts: Option<&I18nOptions>,
    ) -> Result<Vec<FleetWing>, Error> {
        let path = add_options(&format!("v1/fleets/{fid}/wings/"), opts)?;
        self.client
            .call(ctx, Method::GET, &path, None::<&()>)
            .await
    }

    /// Create a wing and return its id.
    pub async fn create_wing(&self, ctx: &Context, fid: i64) -> Result<i64, Error> {
        let path = format!("v1/fleets/{fid}/wings/");
        let created: CreatedWing = self
            .client
            .call(ctx, Method::POST, &path, None::<&()>)
            .await?;
        Ok(created.wing_id)
    }

    /// Delete a wing. Its squads, if any, must be empty.
    pub async fn delete_wing(&self, ctx: &Context, fid: i64, wid: i64) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/wings/{wid}/");
        self.client
            .exec(ctx, Method::DELETE, &path, None::<&()>)
            .await
    }

    pub async fn rename_wing(
        &self,
        ctx: &Context,
        fid: i64,
        wid: i64,
        name: &str,
    ) -> Result<Response, Error> {
        let path = format!("v1/fleets/{fid}/wings/{wid}/");
        let body = Naming {
            name: name.to_string(),
        };
        self.client
            .exec(ctx, Method::PUT, &path, Some(&body))
            .await
    }

    /// Create a squad in a wing and return its id.
    pub async fn create_squad(&self, ctx: &Context, fid: i64, wid: i64) -> Result<i64, Error> {
        let path = format!("v1/fleets/{fid}/wings/{wid}/squads/");
        let created: CreatedSquad = self
            .client
            .call(ctx, Method::POST, &path, None::<&()>)
            .await?;
        Ok(created.squad_id)
    }
}
