// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::context::ServerContext;
use dropshot::HttpError;
use dropshot::HttpResponseCreated;
use dropshot::HttpResponseOk;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::TypedBody;
use failures_api::*;
use std::sync::Arc;

type FailuresApiDescription = dropshot::ApiDescription<Arc<ServerContext>>;

pub fn api() -> FailuresApiDescription {
    failures_api_mod::api_description::<FailuresServerImpl>()
        .expect("registered entrypoints")
}

enum FailuresServerImpl {}

impl FailuresApi for FailuresServerImpl {
    type Context = Arc<ServerContext>;

    async fn failure_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<FailureListFilter>,
    ) -> Result<HttpResponseOk<Vec<FailureRecord>>, HttpError> {
        let ctx = rqctx.context();
        let filter = query.into_inner();
        Ok(HttpResponseOk(ctx.store().failure_list(&filter)))
    }

    async fn failure_create(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<FailureCreate>,
    ) -> Result<HttpResponseCreated<FailureRecord>, HttpError> {
        let ctx = rqctx.context();
        let record = ctx.store().failure_create(body.into_inner());
        Ok(HttpResponseCreated(record))
    }

    async fn failure_get(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError> {
        let ctx = rqctx.context();
        let id = path_params.into_inner().id;
        let record = ctx.store().failure_get(id)?;
        Ok(HttpResponseOk(record))
    }

    async fn failure_update(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
        body: TypedBody<FailureUpdate>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError> {
        let ctx = rqctx.context();
        let id = path_params.into_inner().id;
        let record = ctx.store().failure_update(id, body.into_inner())?;
        Ok(HttpResponseOk(record))
    }

    async fn failure_approve(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
        body: TypedBody<FailureApproval>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError> {
        let ctx = rqctx.context();
        let id = path_params.into_inner().id;
        let approval = body.into_inner();
        let record =
            ctx.store().failure_approve(id, approval.approved_by)?;
        Ok(HttpResponseOk(record))
    }

    async fn failure_anp_submit(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError> {
        let ctx = rqctx.context();
        let id = path_params.into_inner().id;
        let record = ctx.store().failure_anp_submit(id)?;
        Ok(HttpResponseOk(record))
    }

    async fn email_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<EmailListFilter>,
    ) -> Result<HttpResponseOk<Vec<EmailListEntry>>, HttpError> {
        let ctx = rqctx.context();
        let filter = query.into_inner();
        Ok(HttpResponseOk(ctx.store().email_list(&filter)))
    }

    async fn email_add(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EmailListEntryCreate>,
    ) -> Result<HttpResponseCreated<EmailListEntry>, HttpError> {
        let ctx = rqctx.context();
        let entry = ctx.store().email_add(body.into_inner());
        Ok(HttpResponseCreated(entry))
    }

    async fn alert_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<AlertListFilter>,
    ) -> Result<HttpResponseOk<Vec<Alert>>, HttpError> {
        let ctx = rqctx.context();
        let filter = query.into_inner();
        Ok(HttpResponseOk(ctx.store().alert_list(&filter)))
    }

    async fn alert_create(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<AlertCreate>,
    ) -> Result<HttpResponseCreated<Alert>, HttpError> {
        let ctx = rqctx.context();
        let alert = ctx.store().alert_create(body.into_inner());
        Ok(HttpResponseCreated(alert))
    }

    async fn alert_acknowledge(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<AlertPathParam>,
        body: TypedBody<AlertAcknowledge>,
    ) -> Result<HttpResponseOk<Alert>, HttpError> {
        let ctx = rqctx.context();
        let id = path_params.into_inner().id;
        let ack = body.into_inner();
        let alert = ctx.store().alert_acknowledge(id, ack.acknowledged_by)?;
        Ok(HttpResponseOk(alert))
    }
}
