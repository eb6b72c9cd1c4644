//! Offline generation backend.
//!
//! The studio works without a generative service: this rule-based backend
//! proposes the default feature plan on the planning turn and answers later
//! turns with a complete, canned CAP application response. Responses carry
//! fenced file regions in the same shape a real backend would produce, so
//! the whole pipeline downstream of the payload behaves identically.

use async_trait::async_trait;

use capstudio_session::{
    default_plan, AssistantPayload, BackendContext, GenerationBackend, SessionResult,
};

pub struct OfflineBackend;

#[async_trait]
impl GenerationBackend for OfflineBackend {
    async fn generate(
        &self,
        prompt: &str,
        ctx: &BackendContext,
    ) -> SessionResult<AssistantPayload> {
        if ctx.first_turn {
            return Ok(AssistantPayload::Plan(default_plan(prompt)));
        }
        if prompt.to_lowercase().contains("error") {
            return Ok(AssistantPayload::Text(fix_response()));
        }
        Ok(AssistantPayload::Text(app_response(prompt, &ctx.project)))
    }
}

fn app_response(prompt: &str, project: &str) -> String {
    format!(
        r#"I'll build that for you! Here's the plan for **{project}**:

🏗️ **Database Layer**: entities with proper relationships
🔗 **API Layer**: OData services for all CRUD operations
📊 **Sample Data**: realistic test data to get you started

Request: {prompt}

```cds /db/schema.cds
namespace app.generated;

entity Item {{
  key ID: UUID;
  name: String(100) @mandatory;
  description: String(500);
  createdAt: DateTime @cds.on.insert: $now;
}}
```

```cds /srv/service.cds
using app.generated as db from '../db/schema';

service MainService {{
  entity Items as projection on db.Item;
}}
```

```csv /db/data/app.generated-Item.csv
ID;name;description
201b8b39-1d41-4a3e-b1f4-3a6f2c1d9b01;First item;Generated sample record
6f0e2dd0-52a9-4c7a-9a3e-8e2f4b7c5d02;Second item;Generated sample record
```

Run `npm start` in the terminal once generation completes!"#
    )
}

fn fix_response() -> String {
    r#"Let's fix that! The handler wasn't validating its input before use; here's a corrected version:

```js /srv/handlers.js
const cds = require('@sap/cds');

module.exports = cds.service.impl(async function() {
  const { Items } = this.entities;

  this.before('CREATE', 'Items', async (req) => {
    if (!req.data.name) {
      req.error(400, 'Item name is required');
    }
  });
});
```

Restart the server with `npm start` and the error should be gone."#
        .to_string()
}
