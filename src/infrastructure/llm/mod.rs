mod openai_rewrite_client;

pub use openai_rewrite_client::OpenAiRewriteClient;
