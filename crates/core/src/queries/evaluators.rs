use arize_domain::Evaluator;

use super::SpaceVariables;

connection_descriptor! {
    /// Online LLM evaluators configured in a space.
    GetAllEvaluatorsQuery {
        variables: SpaceVariables,
        item: Evaluator,
        path: ["node", "evaluators"],
        description: "Error getting evaluators",
        query: r#"
            query getAllEvaluators($spaceId: ID!, $endCursor: String) {
              node(id: $spaceId) {
                ... on Space {
                  evaluators(first: 100, after: $endCursor) {
                    pageInfo { hasNextPage endCursor }
                    edges { node { id name description taskType createdAt } }
                  }
                }
              }
            }
        "#,
    }
}
